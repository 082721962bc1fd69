// ID3v2.4 frame identifiers and encodings used by the tag builder

/// Text encoding marker byte for UTF-8, the only encoding the builder writes
pub const UTF8_ENCODING: u8 = 3;

/// Size of a frame header: 4-byte id, 4-byte synchsafe size, 2 flag bytes
pub const FRAME_HEADER_SIZE: usize = 10;

/// Language code written into comment frames
pub const COMMENT_LANGUAGE: &[u8; 3] = b"eng";

/// Description of the TXXX frame carrying the SPC dumper
pub const DUMPER_DESCRIPTION: &str = "spc_dumper";

/// ID3v2.4 frame identifiers written from SPC metadata
pub mod frame_ids {
    pub const TITLE: &[u8; 4] = b"TIT2";     // Title/songname/content description
    pub const ALBUM: &[u8; 4] = b"TALB";     // Album/Movie/Show title
    pub const ARTIST: &[u8; 4] = b"TPE1";    // Lead performer(s)/Soloist(s)
    pub const PUBLISHER: &[u8; 4] = b"TPUB"; // Publisher
    pub const YEAR: &[u8; 4] = b"TDRC";      // Recording time
    pub const COMMENT: &[u8; 4] = b"COMM";   // Comments
    pub const USER_TEXT: &[u8; 4] = b"TXXX"; // User defined text information
}

/// Payload size of a plain text frame: encoding + text + NUL
pub fn text_payload_len(text: &[u8]) -> usize {
    1 + text.len() + 1
}

/// Payload size of a comment frame: encoding + language + empty description
/// NUL + text + NUL
pub fn comment_payload_len(text: &[u8]) -> usize {
    1 + COMMENT_LANGUAGE.len() + 1 + text.len() + 1
}

/// Payload size of a TXXX frame: encoding + description + NUL + text + NUL
pub fn user_text_payload_len(description: &[u8], text: &[u8]) -> usize {
    1 + description.len() + 1 + text.len() + 1
}
