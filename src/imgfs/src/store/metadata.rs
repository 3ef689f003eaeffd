use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// Max length of a metadata record's `img_id` field, NUL terminator included.
pub const MAX_IMG_ID: usize = 128;

/// On-disk size of [`MetadataRecord`], fixed regardless of compiler/struct-
/// padding settings: every field below is read/written at an explicit offset.
pub const METADATA_SIZE: usize = 208;

pub const SHA256_DIGEST_LEN: usize = 32;

/// One of the three resolutions a slot may hold a materialised payload at.
/// Indexes into `size`/`offset` follow the source's `THUMB_RES(0)`,
/// `SMALL_RES(1)`, `ORIG_RES(2)` ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Thumb,
    Small,
    Orig,
}

impl Resolution {
    pub fn index(self) -> usize {
        match self {
            Resolution::Thumb => 0,
            Resolution::Small => 1,
            Resolution::Orig => 2,
        }
    }

    /// Parses the HTTP/CLI resolution vocabulary from §6: `thumb`,
    /// `thumbnail`, `small`, `orig`, `original`. Any other string is
    /// rejected, mirroring the original's `resolution_atoi`.
    pub fn parse(s: &str) -> Option<Resolution> {
        match s {
            "thumb" | "thumbnail" => Some(Resolution::Thumb),
            "small" => Some(Resolution::Small),
            "orig" | "original" => Some(Resolution::Orig),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Empty,
    NonEmpty,
}

impl Validity {
    fn to_u16(self) -> u16 {
        match self {
            Validity::Empty => 0,
            Validity::NonEmpty => 1,
        }
    }

    fn from_u16(v: u16) -> Validity {
        if v == 0 {
            Validity::Empty
        } else {
            Validity::NonEmpty
        }
    }
}

/// In-memory mirror of one fixed-layout metadata slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord {
    pub img_id: String,
    pub sha: [u8; SHA256_DIGEST_LEN],
    pub orig_res: (u32, u32),
    pub size: [u32; 3],
    pub offset: [u64; 3],
    pub is_valid: Validity,
}

impl MetadataRecord {
    pub fn empty() -> MetadataRecord {
        MetadataRecord {
            img_id: String::new(),
            sha: [0u8; SHA256_DIGEST_LEN],
            orig_res: (0, 0),
            size: [0; 3],
            offset: [0; 3],
            is_valid: Validity::Empty,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid == Validity::NonEmpty
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let mut id_bytes = [0u8; MAX_IMG_ID];
        let src = self.img_id.as_bytes();
        let n = src.len().min(MAX_IMG_ID - 1);
        id_bytes[..n].copy_from_slice(&src[..n]);
        w.write_all(&id_bytes)?;

        w.write_all(&self.sha)?;

        w.write_u32::<LittleEndian>(self.orig_res.0)?;
        w.write_u32::<LittleEndian>(self.orig_res.1)?;

        for v in &self.size {
            w.write_u32::<LittleEndian>(*v)?;
        }
        for v in &self.offset {
            w.write_u64::<LittleEndian>(*v)?;
        }

        w.write_u16::<LittleEndian>(self.is_valid.to_u16())?;
        // reserved 16-bit word.
        w.write_u16::<LittleEndian>(0)?;
        Ok(())
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<MetadataRecord> {
        let mut id_bytes = [0u8; MAX_IMG_ID];
        r.read_exact(&mut id_bytes)?;
        let nul = id_bytes.iter().position(|b| *b == 0).unwrap_or(id_bytes.len());
        let img_id = String::from_utf8_lossy(&id_bytes[..nul]).into_owned();

        let mut sha = [0u8; SHA256_DIGEST_LEN];
        r.read_exact(&mut sha)?;

        let orig_res = (r.read_u32::<LittleEndian>()?, r.read_u32::<LittleEndian>()?);

        let mut size = [0u32; 3];
        for v in size.iter_mut() {
            *v = r.read_u32::<LittleEndian>()?;
        }
        let mut offset = [0u64; 3];
        for v in offset.iter_mut() {
            *v = r.read_u64::<LittleEndian>()?;
        }

        let is_valid = Validity::from_u16(r.read_u16::<LittleEndian>()?);
        let _reserved_16 = r.read_u16::<LittleEndian>()?;

        Ok(MetadataRecord {
            img_id,
            sha,
            orig_res,
            size,
            offset,
            is_valid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_bytes() {
        let mut record = MetadataRecord::empty();
        record.img_id = "cat.jpg".to_string();
        record.sha = [0x42; SHA256_DIGEST_LEN];
        record.orig_res = (640, 480);
        record.size = [0, 0, 12345];
        record.offset = [0, 0, 64 + 208];
        record.is_valid = Validity::NonEmpty;

        let mut buf = Vec::new();
        record.write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), METADATA_SIZE);

        let read_back = MetadataRecord::read_from(&mut &buf[..]).unwrap();
        assert_eq!(record, read_back);
    }

    #[test]
    fn resolution_parses_the_http_vocabulary() {
        assert_eq!(Resolution::parse("thumb"), Some(Resolution::Thumb));
        assert_eq!(Resolution::parse("thumbnail"), Some(Resolution::Thumb));
        assert_eq!(Resolution::parse("small"), Some(Resolution::Small));
        assert_eq!(Resolution::parse("orig"), Some(Resolution::Orig));
        assert_eq!(Resolution::parse("original"), Some(Resolution::Orig));
        assert_eq!(Resolution::parse("huge"), None);
    }
}
