// ID3v2.4 tag builder and reader

use super::buffer::TagBuffer;
use super::frames::{self, frame_ids, FRAME_HEADER_SIZE, UTF8_ENCODING};
use crate::error::Result;
use crate::utils::io::{pack_synchsafe_u32, read_synchsafe_u32, synchsafe_bytes};

/// ID3v2 header structure
#[derive(Debug, PartialEq)]
pub struct Id3v2Header {
    pub version: (u8, u8),
    pub flags: u8,
    pub size: u32,
}

impl Id3v2Header {
    pub const HEADER_SIZE: usize = 10;
    const ID: [u8; 3] = [b'I', b'D', b'3'];
    const VERSION: (u8, u8) = (4, 0);
    const SIZE_OFFSET: usize = 6;

    /// Parse the 10-byte preamble at the start of `data`
    pub fn parse(data: &[u8]) -> Option<Self> {
        let buffer = data.get(..Self::HEADER_SIZE)?;
        if buffer[0..3] != Self::ID {
            return None;
        }

        Some(Id3v2Header {
            version: (buffer[3], buffer[4]),
            flags: buffer[5],
            size: read_synchsafe_u32(&buffer[6..10]),
        })
    }
}

/// Writes frames into a caller-owned `TagBuffer`.
///
/// After every call the preamble's size field equals `len - 10`, so the
/// buffer can be serialized at any point.
pub struct Id3v2Builder<'a> {
    buf: &'a mut TagBuffer,
}

impl<'a> Id3v2Builder<'a> {
    /// Reset `buf` to an empty tag: preamble only, size 0
    pub fn init(buf: &'a mut TagBuffer) -> Result<Self> {
        buf.clear();
        let (major, revision) = Id3v2Header::VERSION;
        let mut preamble = [0u8; Id3v2Header::HEADER_SIZE];
        preamble[0..3].copy_from_slice(&Id3v2Header::ID);
        preamble[3] = major;
        preamble[4] = revision;
        preamble[5] = 0x00;
        pack_synchsafe_u32(&mut preamble[6..10], 0);
        buf.append(&preamble)?;
        Ok(Id3v2Builder { buf })
    }

    /// Append a plain text frame (TIT2, TALB, ...)
    pub fn add_text(&mut self, id: &[u8; 4], text: &str) -> Result<()> {
        let text = text.as_bytes();
        let payload_len = frames::text_payload_len(text);
        self.buf.ensure_capacity(FRAME_HEADER_SIZE + payload_len)?;

        self.begin_frame(id, payload_len)?;
        self.buf.append(text)?;
        self.buf.append(&[0x00])?;

        self.update_len();
        Ok(())
    }

    /// Append a COMM frame with language "eng" and an empty short description
    pub fn add_comment(&mut self, text: &str) -> Result<()> {
        let text = text.as_bytes();
        let payload_len = frames::comment_payload_len(text);
        self.buf.ensure_capacity(FRAME_HEADER_SIZE + payload_len)?;

        self.begin_frame(frame_ids::COMMENT, payload_len)?;
        self.buf.append(frames::COMMENT_LANGUAGE)?;
        self.buf.append(&[0x00])?; // short content description
        self.buf.append(text)?;
        self.buf.append(&[0x00])?;

        self.update_len();
        Ok(())
    }

    /// Append a TXXX frame: `description` NUL `text` NUL
    pub fn add_private(&mut self, description: &str, text: &str) -> Result<()> {
        let description = description.as_bytes();
        let text = text.as_bytes();
        let payload_len = frames::user_text_payload_len(description, text);
        self.buf.ensure_capacity(FRAME_HEADER_SIZE + payload_len)?;

        self.begin_frame(frame_ids::USER_TEXT, payload_len)?;
        self.buf.append(description)?;
        self.buf.append(&[0x00])?;
        self.buf.append(text)?;
        self.buf.append(&[0x00])?;

        self.update_len();
        Ok(())
    }

    /// Whether any frame has been added since `init`
    pub fn has_frames(&self) -> bool {
        self.buf.len() > Id3v2Header::HEADER_SIZE
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Frame id, synchsafe payload size, flags and the UTF-8 encoding marker
    fn begin_frame(&mut self, id: &[u8; 4], payload_len: usize) -> Result<()> {
        self.buf.append(id)?;
        self.buf.append(&synchsafe_bytes(payload_len as u32))?;
        self.buf.append(&[0x00, 0x00, UTF8_ENCODING])
    }

    fn update_len(&mut self) {
        let size = (self.buf.len() - Id3v2Header::HEADER_SIZE) as u32;
        self.buf.patch(Id3v2Header::SIZE_OFFSET, &synchsafe_bytes(size));
    }
}

/// ID3v2 frame structure
#[derive(Debug)]
pub struct Id3Frame {
    pub frame_id: String,
    pub size: u32,
    pub flags: u16,
    pub data: Vec<u8>,
}

/// Parsed view of a finished tag
#[derive(Debug)]
pub struct Id3v2Tag {
    pub header: Id3v2Header,
    pub frames: Vec<Id3Frame>,
}

impl Id3v2Tag {
    /// Parse a v2.4 tag from `data`; `None` if the preamble is missing
    pub fn parse(data: &[u8]) -> Option<Self> {
        let header = Id3v2Header::parse(data)?;
        let end = (Id3v2Header::HEADER_SIZE + header.size as usize).min(data.len());

        let mut frames = Vec::new();
        let mut pos = Id3v2Header::HEADER_SIZE;

        while pos + FRAME_HEADER_SIZE <= end {
            let head = &data[pos..pos + FRAME_HEADER_SIZE];

            // Check for padding (all zeros)
            if head.iter().all(|&b| b == 0) {
                break;
            }

            let size = read_synchsafe_u32(&head[4..8]);
            let body_start = pos + FRAME_HEADER_SIZE;
            let body_end = body_start + size as usize;
            if body_end > end {
                break;
            }

            frames.push(Id3Frame {
                frame_id: String::from_utf8_lossy(&head[0..4]).to_string(),
                size,
                flags: ((head[8] as u16) << 8) | (head[9] as u16),
                data: data[body_start..body_end].to_vec(),
            });
            pos = body_end;
        }

        Some(Id3v2Tag { header, frames })
    }

    pub fn frame_ids(&self) -> Vec<String> {
        self.frames.iter().map(|f| f.frame_id.clone()).collect()
    }
}
