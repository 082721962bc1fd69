// ID666 metadata reader for SPC sound files
//
// An SPC file starts with a 0x100-byte header carrying the ID666 block in
// either a text or a binary layout, followed by the APU RAM and DSP register
// image. An optional "xid6" chunk after the image holds extended fields that
// override the header ones.

use chrono::NaiveDate;

use crate::error::{ConvertError, Result};
use crate::utils::encoding::decode_field;
use crate::utils::io::{read_le_u16, read_le_u32, read_le_uint};

/// Leading signature of every SPC file
pub const SPC_SIGNATURE: &[u8] = b"SNES-SPC700 Sound File Data";

/// Header + 64 KiB RAM + DSP registers + unused + IPL RAM
pub const SPC_MIN_SIZE: usize = 0x10200;

/// Length unit of `play_len`, `fade` and `total_len`: 1/64000 second
pub const TICKS_PER_SECOND: u64 = 64_000;

/// Value of `amp` meaning unity gain
pub const UNITY_AMP: u32 = 0x10000;

const DEFAULT_PLAY_SECONDS: u64 = 180;
const DEFAULT_FADE_SECONDS: u64 = 10;

const HAS_ID666_OFFSET: usize = 0x23;
const HAS_ID666: u8 = 26;
const XID6_OFFSET: usize = 0x10200;

/// Field layout of the ID666 header block
#[derive(Debug, Clone, Copy)]
struct Layout {
    song: (usize, usize),
    game: (usize, usize),
    dumper: (usize, usize),
    comment: (usize, usize),
    artist: (usize, usize),
}

const FIELDS: Layout = Layout {
    song: (0x2E, 32),
    game: (0x4E, 32),
    dumper: (0x6E, 16),
    comment: (0x7E, 32),
    artist: (0xB1, 32),
};

const BINARY_FIELDS: Layout = Layout {
    artist: (0xB0, 32),
    ..FIELDS
};

/// xid6 sub-chunk identifiers
mod xid6 {
    pub const SONG: u8 = 0x01;
    pub const GAME: u8 = 0x02;
    pub const ARTIST: u8 = 0x03;
    pub const DUMPER: u8 = 0x04;
    pub const DATE: u8 = 0x05;
    pub const COMMENT: u8 = 0x07;
    pub const PUBLISHER: u8 = 0x13;
    pub const YEAR: u8 = 0x14;
    pub const INTRO: u8 = 0x30;
    pub const LOOP: u8 = 0x31;
    pub const END: u8 = 0x32;
    pub const FADE: u8 = 0x33;
    pub const LOOP_COUNT: u8 = 0x35;
    pub const AMP: u8 = 0x36;

    pub const TYPE_INLINE: u8 = 0;
}

/// Metadata extracted from an SPC file
#[derive(Debug, Clone, PartialEq)]
pub struct SpcMetadata {
    pub song: String,
    pub game: String,
    pub artist: String,
    pub dumper: String,
    pub comment: String,
    pub publisher: String,
    pub dumped: Option<NaiveDate>,
    /// Copyright year; `None` when unknown
    pub year: Option<i32>,
    /// Length before the fade starts, in ticks
    pub play_len: u64,
    /// Fade length in ticks
    pub fade: u64,
    /// `play_len + fade`, in ticks
    pub total_len: u64,
    /// Amplification, 16.16 fixed point
    pub amp: u32,
    /// Whether the header used the binary ID666 layout
    pub binary: bool,
}

impl Default for SpcMetadata {
    fn default() -> Self {
        let play_len = DEFAULT_PLAY_SECONDS * TICKS_PER_SECOND;
        let fade = DEFAULT_FADE_SECONDS * TICKS_PER_SECOND;
        SpcMetadata {
            song: String::new(),
            game: String::new(),
            artist: String::new(),
            dumper: String::new(),
            comment: String::new(),
            publisher: String::new(),
            dumped: None,
            year: None,
            play_len,
            fade,
            total_len: play_len + fade,
            amp: UNITY_AMP,
            binary: false,
        }
    }
}

/// Extended-chunk overrides collected before they are merged
#[derive(Default)]
struct Extended {
    intro: Option<u64>,
    loop_len: Option<u64>,
    end: Option<u64>,
    loop_count: Option<u64>,
    fade: Option<u64>,
}

impl SpcMetadata {
    /// Parse the metadata of a complete SPC image
    pub fn parse(data: &[u8]) -> Result<Self> {
        if !data.starts_with(SPC_SIGNATURE) {
            return Err(ConvertError::Metadata("missing SPC signature".to_string()));
        }
        if data.len() < SPC_MIN_SIZE {
            return Err(ConvertError::Metadata(format!(
                "file is {} bytes, expected at least {}",
                data.len(),
                SPC_MIN_SIZE
            )));
        }

        let mut meta = SpcMetadata::default();
        if data[HAS_ID666_OFFSET] == HAS_ID666 {
            meta.read_header(data);
        }
        meta.read_extended(data);
        meta.total_len = meta.play_len + meta.fade;
        Ok(meta)
    }

    /// Frames to render at 32 kHz
    pub fn total_frames(&self) -> u64 {
        self.total_len / 2
    }

    /// Frames of the trailing fade at 32 kHz
    pub fn fade_frames(&self) -> u64 {
        self.fade / 2
    }

    /// Filter gain derived from `amp` (unity amp gives 0x100)
    pub fn amp_gain(&self) -> u32 {
        self.amp / 0x100
    }

    fn read_header(&mut self, data: &[u8]) {
        self.binary = !is_text_layout(data);
        let layout = if self.binary { BINARY_FIELDS } else { FIELDS };
        let field = |(offset, len): (usize, usize)| decode_field(&data[offset..offset + len]);

        self.song = field(layout.song);
        self.game = field(layout.game);
        self.dumper = field(layout.dumper);
        self.comment = field(layout.comment);
        self.artist = field(layout.artist);

        let (seconds, fade_ms) = if self.binary {
            self.dumped = binary_date(data);
            (
                read_le_uint(data, 0xA9, 3).unwrap_or(0) as u64,
                read_le_u32(data, 0xAC).unwrap_or(0) as u64,
            )
        } else {
            self.dumped = text_date(&decode_field(&data[0x9E..0xA9]));
            (
                decode_field(&data[0xA9..0xAC]).trim().parse().unwrap_or(0),
                decode_field(&data[0xAC..0xB1]).trim().parse().unwrap_or(0),
            )
        };

        if seconds > 0 {
            self.play_len = seconds * TICKS_PER_SECOND;
        }
        if fade_ms > 0 {
            self.fade = fade_ms * (TICKS_PER_SECOND / 1000);
        }
    }

    fn read_extended(&mut self, data: &[u8]) {
        if data.get(XID6_OFFSET..XID6_OFFSET + 4) != Some(b"xid6".as_slice()) {
            return;
        }
        let Some(size) = read_le_u32(data, XID6_OFFSET + 4) else {
            return;
        };

        let start = XID6_OFFSET + 8;
        let end = (start + size as usize).min(data.len());
        let mut ext = Extended::default();
        let mut pos = start;

        while pos + 4 <= end {
            let id = data[pos];
            let kind = data[pos + 1];
            let len = read_le_u16(data, pos + 2).unwrap_or(0) as usize;
            pos += 4;

            if kind == xid6::TYPE_INLINE {
                self.apply_extended(id, &[], len as u64, &mut ext);
                continue;
            }

            let Some(body) = data.get(pos..pos + len).filter(|_| pos + len <= end) else {
                log::warn!("xid6 sub-chunk 0x{:02x} overruns the chunk, ignoring the rest", id);
                break;
            };
            let value = read_le_uint(body, 0, len.min(4)).unwrap_or(0) as u64;
            self.apply_extended(id, body, value, &mut ext);
            pos += (len + 3) & !3;
        }

        if ext.intro.is_some() || ext.loop_len.is_some() || ext.end.is_some() {
            let loops = ext.loop_count.unwrap_or(1);
            let play = ext.intro.unwrap_or(0) + ext.loop_len.unwrap_or(0) * loops + ext.end.unwrap_or(0);
            if play > 0 {
                self.play_len = play;
            }
        }
        if let Some(fade) = ext.fade {
            self.fade = fade;
        }
    }

    fn apply_extended(&mut self, id: u8, body: &[u8], value: u64, ext: &mut Extended) {
        match id {
            xid6::SONG => self.song = decode_field(body),
            xid6::GAME => self.game = decode_field(body),
            xid6::ARTIST => self.artist = decode_field(body),
            xid6::DUMPER => self.dumper = decode_field(body),
            xid6::COMMENT => self.comment = decode_field(body),
            xid6::PUBLISHER => self.publisher = decode_field(body),
            xid6::DATE => self.dumped = packed_date(value as u32).or(self.dumped),
            xid6::YEAR => self.year = Some(value as i32),
            xid6::INTRO => ext.intro = Some(value),
            xid6::LOOP => ext.loop_len = Some(value),
            xid6::END => ext.end = Some(value),
            xid6::FADE => ext.fade = Some(value),
            xid6::LOOP_COUNT => ext.loop_count = Some(value),
            xid6::AMP => self.amp = value as u32,
            _ => log::debug!("skipping xid6 sub-chunk 0x{:02x}", id),
        }
    }
}

/// The text layout stores the dump date as `MM/DD/YYYY` and lengths as
/// ASCII digits padded with NULs or spaces. In the binary layout the artist
/// field starts at 0xB0, inside the range text files reserve for the fade
/// length, so any printable artist name fails the digit check.
fn is_text_layout(data: &[u8]) -> bool {
    if data[0x9E..0xA9].contains(&b'/') {
        return true;
    }
    let padded_digits = |range: std::ops::Range<usize>, extra: &[u8]| {
        data[range]
            .iter()
            .all(|&b| b == 0 || b == b' ' || b.is_ascii_digit() || extra.contains(&b))
    };
    padded_digits(0xA9..0xB1, &[]) && padded_digits(0x9E..0xA9, b"-")
}

fn text_date(s: &str) -> Option<NaiveDate> {
    ["%m/%d/%Y", "%Y/%m/%d", "%Y-%m-%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

fn binary_date(data: &[u8]) -> Option<NaiveDate> {
    let day = data[0x9E] as u32;
    let month = data[0x9F] as u32;
    let year = read_le_u16(data, 0xA0)? as i32;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Date packed as the decimal number YYYYMMDD
fn packed_date(value: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt((value / 10_000) as i32, (value / 100) % 100, value % 100)
}
