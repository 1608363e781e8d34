use std::{
    fmt::{self, Debug, Formatter},
    io::{self, Write},
};

use base64::{
    engine::{general_purpose::STANDARD, GeneralPurpose},
    write::EncoderWriter,
};

use super::{encoder::LineWrapper, State};

/// Writer for the body of an open part
///
/// Everything written is base64 encoded and wrapped at 76 columns straight
/// into the message. The part is closed by [`PartEncoder::finish`], or when
/// the encoder is dropped, which writes the final base64 quantum.
pub struct PartEncoder<'a> {
    encoder: EncoderWriter<'static, GeneralPurpose, LineWrapper<&'a mut Vec<u8>>>,
    state: &'a mut State,
    finished: bool,
}

impl<'a> PartEncoder<'a> {
    pub(super) fn new(buffer: &'a mut Vec<u8>, state: &'a mut State) -> Self {
        Self {
            encoder: EncoderWriter::new(LineWrapper::new(buffer), &STANDARD),
            state,
            finished: false,
        }
    }

    /// Writes the final padding and closes the part
    pub fn finish(mut self) -> io::Result<()> {
        self.close()
    }

    fn close(&mut self) -> io::Result<()> {
        self.finished = true;
        let result = self.encoder.finish().map(|_| ());
        *self.state = State::PartClosed;
        result
    }
}

impl Write for PartEncoder<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.encoder.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.encoder.flush()
    }
}

impl Drop for PartEncoder<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.close();
        }
    }
}

impl Debug for PartEncoder<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartEncoder")
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}
