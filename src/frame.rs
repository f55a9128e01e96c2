use crate::FrameError;

pub const OP_CONTINUE: u8 = 0;
pub const OP_TEXT: u8 = 1;
pub const OP_BINARY: u8 = 2;
pub const OP_CLOSE: u8 = 8;
pub const OP_PING: u8 = 9;
pub const OP_PONG: u8 = 10;

/// A single WebSocket data frame.
///
/// ```txt
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-------+-+-------------+-------------------------------+
/// |F|R|R|R| opcode|M| Payload len |    Extended payload length    |
/// |I|S|S|S|  (4)  |A|     (7)     |             (16/64)           |
/// |N|V|V|V|       |S|             |   (if payload len==126/127)   |
/// | |1|2|3|       |K|             |                               |
/// +-+-+-+-+-------+-+-------------+ - - - - - - - - - - - - - - - +
/// |     Extended payload length continued, if payload len == 127  |
/// + - - - - - - - - - - - - - - - +-------------------------------+
/// |                               |Masking-key, if MASK set to 1  |
/// +-------------------------------+-------------------------------+
/// | Masking-key (continued)       |          Payload Data         |
/// +-------------------------------- - - - - - - - - - - - - - - - +
/// :                     Payload Data continued ...                :
/// + - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - +
/// |                     Payload Data continued ...                |
/// +---------------------------------------------------------------+
/// ```
///
/// `payload` always holds the *unmasked* data: [`Frame::decode`] removes the
/// mask, [`Frame::encode`] applies it when `masking_key` is present. The MASK
/// wire bit is derived from `masking_key.is_some()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Indicates that this is the final fragment in a message.  The first
    /// fragment MAY also be the final fragment.
    pub fin: bool,

    /// Frame type tag; only the low 4 bits are significant.
    pub opcode: u8,

    /// Present iff the payload is masked, in wire byte order.
    pub masking_key: Option<[u8; 4]>,

    /// The "Payload data", unmasked.
    pub payload: Vec<u8>,
}

impl Frame {
    /// An unfragmented text frame. Mask it by setting `masking_key`.
    pub fn text(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            fin: true,
            opcode: OP_TEXT,
            masking_key: None,
            payload: payload.into(),
        }
    }

    /// Parse one frame from `buf`. Every read is bounds-checked: a buffer
    /// shorter than its own header promises yields
    /// [`FrameError::IncompleteFrame`].
    ///
    /// `buf` is expected to hold exactly one frame; trailing bytes are
    /// ignored. RSV bits are ignored as well.
    pub fn decode(buf: &[u8]) -> Result<Self, FrameError> {
        let mut at = 0;
        let [b1, b2] = *take_array(buf, &mut at)?;

        let fin = b1 & 0x80 != 0;
        let opcode = b1 & 0x0F;
        let is_masked = b2 & 0x80 != 0;

        let len = match (b2 & 0x7F) as u64 {
            126 => u16::from_be_bytes(*take_array(buf, &mut at)?) as u64,
            127 => u64::from_be_bytes(*take_array(buf, &mut at)?),
            len => len,
        };
        // The most significant bit of a 64-bit length MUST be 0.
        if len > i64::MAX as u64 {
            return Err(FrameError::InvalidLength);
        }
        let len = usize::try_from(len).map_err(|_| FrameError::InvalidLength)?;

        let masking_key = match is_masked {
            true => Some(*take_array::<4>(buf, &mut at)?),
            false => None,
        };

        let mut payload = take(buf, &mut at, len)?.to_vec();
        if let Some(key) = masking_key {
            apply_mask(&mut payload, key);
        }

        Ok(Self {
            fin,
            opcode,
            masking_key,
            payload,
        })
    }

    /// Serialize to the minimal wire form. The length-field width and the
    /// buffer capacity follow a single threshold policy: `< 126`, `< 65536`,
    /// else 64-bit.
    pub fn encode(&self) -> Vec<u8> {
        let len = self.payload.len();
        let mask_bit = if self.masking_key.is_some() { 0x80 } else { 0 };

        let extra = match len {
            0..=125 => 0,
            126..=65535 => 2,
            _ => 8,
        };
        let key_len = if self.masking_key.is_some() { 4 } else { 0 };
        let mut buf = Vec::with_capacity(2 + extra + key_len + len);

        buf.push(((self.fin as u8) << 7) | (self.opcode & 0x0F));
        match len {
            0..=125 => buf.push(mask_bit | len as u8),
            126..=65535 => {
                buf.push(mask_bit | 126);
                buf.extend_from_slice(&(len as u16).to_be_bytes());
            }
            _ => {
                buf.push(mask_bit | 127);
                buf.extend_from_slice(&(len as u64).to_be_bytes());
            }
        }

        match self.masking_key {
            Some(key) => {
                buf.extend_from_slice(&key);
                buf.extend(
                    self.payload
                        .iter()
                        .enumerate()
                        .map(|(i, byte)| byte ^ key[i % 4]),
                );
            }
            None => buf.extend_from_slice(&self.payload),
        }
        buf
    }
}

pub(crate) fn apply_mask(data: &mut [u8], mask: [u8; 4]) {
    for (i, byte) in data.iter_mut().enumerate() {
        *byte ^= mask[i % 4];
    }
}

fn take<'a>(buf: &'a [u8], at: &mut usize, n: usize) -> Result<&'a [u8], FrameError> {
    let end = at.checked_add(n).ok_or(FrameError::InvalidLength)?;
    let bytes = buf
        .get(*at..end)
        .ok_or(FrameError::IncompleteFrame {
            needed: end,
            have: buf.len(),
        })?;
    *at = end;
    Ok(bytes)
}

fn take_array<'a, const N: usize>(
    buf: &'a [u8],
    at: &mut usize,
) -> Result<&'a [u8; N], FrameError> {
    take(buf, at, N).map(|bytes| bytes.try_into().unwrap())
}
