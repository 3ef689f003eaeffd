use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// Store tag stamped into every header at creation time.
pub const STORE_NAME: &str = "imgFS2024";

/// Max length of the header's `name` field, NUL terminator included.
pub const MAX_IMGFS_NAME: usize = 32;

/// On-disk size of [`Header`], fixed regardless of compiler/struct-padding
/// settings: every field below is read/written at an explicit offset.
pub const HEADER_SIZE: usize = 64;

/// In-memory mirror of the store's fixed-layout header record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub version: u32,
    pub nb_files: u32,
    pub max_files: u32,
    /// `[thumb_w, thumb_h, small_w, small_h]`.
    pub resized_res: [u16; 4],
}

impl Header {
    pub fn new(max_files: u32, thumb_res: (u16, u16), small_res: (u16, u16)) -> Header {
        Header {
            name: STORE_NAME.to_string(),
            version: 0,
            nb_files: 0,
            max_files,
            resized_res: [thumb_res.0, thumb_res.1, small_res.0, small_res.1],
        }
    }

    pub fn thumb_res(&self) -> (u16, u16) {
        (self.resized_res[0], self.resized_res[1])
    }

    pub fn small_res(&self) -> (u16, u16) {
        (self.resized_res[2], self.resized_res[3])
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let mut name_bytes = [0u8; MAX_IMGFS_NAME];
        let src = self.name.as_bytes();
        let n = src.len().min(MAX_IMGFS_NAME - 1);
        name_bytes[..n].copy_from_slice(&src[..n]);
        w.write_all(&name_bytes)?;

        w.write_u32::<LittleEndian>(self.version)?;
        w.write_u32::<LittleEndian>(self.nb_files)?;
        w.write_u32::<LittleEndian>(self.max_files)?;
        for v in &self.resized_res {
            w.write_u16::<LittleEndian>(*v)?;
        }
        // reserved 32-bit and 64-bit words, for forward compatibility.
        w.write_u32::<LittleEndian>(0)?;
        w.write_u64::<LittleEndian>(0)?;
        Ok(())
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Header> {
        let mut name_bytes = [0u8; MAX_IMGFS_NAME];
        r.read_exact(&mut name_bytes)?;
        let nul = name_bytes.iter().position(|b| *b == 0).unwrap_or(name_bytes.len());
        let name = String::from_utf8_lossy(&name_bytes[..nul]).into_owned();

        let version = r.read_u32::<LittleEndian>()?;
        let nb_files = r.read_u32::<LittleEndian>()?;
        let max_files = r.read_u32::<LittleEndian>()?;
        let mut resized_res = [0u16; 4];
        for v in resized_res.iter_mut() {
            *v = r.read_u16::<LittleEndian>()?;
        }
        let _reserved_32 = r.read_u32::<LittleEndian>()?;
        let _reserved_64 = r.read_u64::<LittleEndian>()?;

        Ok(Header {
            name,
            version,
            nb_files,
            max_files,
            resized_res,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_bytes() {
        let header = Header::new(128, (64, 64), (256, 256));
        let mut buf = Vec::new();
        header.write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), HEADER_SIZE);

        let read_back = Header::read_from(&mut &buf[..]).unwrap();
        assert_eq!(header, read_back);
    }

    #[test]
    fn name_is_stamped_at_creation() {
        let header = Header::new(4, (64, 64), (256, 256));
        assert_eq!(header.name, STORE_NAME);
    }
}
