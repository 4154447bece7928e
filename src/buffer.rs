use core::mem;

#[derive(Debug, Default)]
enum Extended<'b> {
    #[default]
    None,
    Source(&'b [u8]),
    Sink(&'b mut [u8]),
}

/// Data storage for the transaction in flight.
///
/// Transfers of one or two bytes live in the inline `small` pair, longer ones in
/// caller-supplied memory. The inline pair is authoritative whenever `len <= 2`,
/// even if a caller buffer was handed over for a short multi-byte read; that
/// buffer only gets filled once the read completes.
#[derive(Debug, Default)]
pub struct TransferBuffer<'b> {
    small: [u8; 2],
    extended: Extended<'b>,
    index: usize,
    len: usize,
}

impl<'b> TransferBuffer<'b> {
    pub const fn new() -> Self {
        Self {
            small: [0; 2],
            extended: Extended::None,
            index: 0,
            len: 0,
        }
    }

    pub(crate) fn arm_small_write(&mut self, bytes: &[u8]) {
        debug_assert!(matches!(bytes.len(), 1 | 2));
        self.small[..bytes.len()].copy_from_slice(bytes);
        self.extended = Extended::None;
        self.rewind(bytes.len());
    }

    pub(crate) fn arm_write(&mut self, buf: &'b [u8]) {
        if buf.len() <= 2 {
            self.arm_small_write(buf);
        } else {
            self.extended = Extended::Source(buf);
            self.rewind(buf.len());
        }
    }

    pub(crate) fn arm_small_read(&mut self, len: usize) {
        debug_assert!(matches!(len, 1 | 2));
        self.extended = Extended::None;
        self.rewind(len);
    }

    pub(crate) fn arm_read(&mut self, buf: &'b mut [u8]) {
        let len = buf.len();
        self.extended = Extended::Sink(buf);
        self.rewind(len);
    }

    fn rewind(&mut self, len: usize) {
        self.index = 0;
        self.len = len;
    }

    fn is_small(&self) -> bool {
        self.len <= 2
    }

    fn byte_at(&self, index: usize) -> Option<u8> {
        if index >= self.len {
            None
        } else if self.is_small() {
            Some(self.small[index])
        } else {
            match &self.extended {
                Extended::Source(buf) => buf.get(index).copied(),
                Extended::Sink(buf) => buf.get(index).copied(),
                Extended::None => None,
            }
        }
    }

    pub(crate) fn next_outgoing(&mut self) -> Option<u8> {
        let byte = self.byte_at(self.index)?;
        self.index += 1;
        Some(byte)
    }

    pub(crate) fn resend(&self) -> Option<u8> {
        self.byte_at(self.index.checked_sub(1)?)
    }

    pub(crate) fn store(&mut self, byte: u8) -> bool {
        if self.index >= self.len {
            return false;
        }

        if self.is_small() {
            self.small[self.index] = byte;
        } else if let Extended::Sink(buf) = &mut self.extended {
            buf[self.index] = byte;
        } else {
            return false;
        }

        self.index += 1;
        true
    }

    /// Publishes a short read into the caller's buffer, if one was given.
    pub(crate) fn finish_read(&mut self) {
        if self.is_small() {
            if let Extended::Sink(buf) = &mut self.extended {
                let n = self.len.min(buf.len());
                buf[..n].copy_from_slice(&self.small[..n]);
            }
        }
    }

    pub(crate) fn set_low(&mut self, byte: u8) {
        self.small[0] = byte;
    }

    pub fn remaining(&self) -> usize {
        self.len - self.index
    }

    pub fn is_complete(&self) -> bool {
        self.index == self.len
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn small(&self) -> [u8; 2] {
        self.small
    }

    pub fn data(&self) -> &[u8] {
        if self.is_small() {
            &self.small[..self.len]
        } else {
            match &self.extended {
                Extended::Source(buf) => &buf[..self.len],
                Extended::Sink(buf) => &buf[..self.len],
                Extended::None => &[],
            }
        }
    }

    pub(crate) fn take_extended(&mut self) -> Option<&'b mut [u8]> {
        match mem::take(&mut self.extended) {
            Extended::Sink(buf) => Some(buf),
            other => {
                self.extended = other;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_writes_stay_inline() {
        let data = [0x11, 0x22];
        let mut buf = TransferBuffer::new();
        buf.arm_write(&data);

        assert_eq!(buf.next_outgoing(), Some(0x11));
        assert_eq!(buf.resend(), Some(0x11));
        assert_eq!(buf.next_outgoing(), Some(0x22));
        assert_eq!(buf.resend(), Some(0x22));
        assert_eq!(buf.next_outgoing(), None);
        assert!(buf.is_complete());
        assert_eq!(buf.small(), [0x11, 0x22]);
    }

    #[test]
    fn long_writes_walk_the_caller_buffer() {
        let data = [1, 2, 3, 4];
        let mut buf = TransferBuffer::new();
        buf.arm_write(&data);

        assert_eq!(buf.resend(), None);
        let sent: heapless::Vec<u8, 4> = core::iter::from_fn(|| buf.next_outgoing()).collect();
        assert_eq!(&sent[..], &data[..]);
        assert_eq!(buf.index(), 4);
        assert_eq!(buf.data(), &data[..]);
    }

    #[test]
    fn store_never_runs_past_the_end() {
        let mut sink = [0; 3];
        let mut buf = TransferBuffer::new();
        buf.arm_read(&mut sink);

        assert!(buf.store(7));
        assert!(buf.store(8));
        assert_eq!(buf.remaining(), 1);
        assert!(buf.store(9));
        assert!(!buf.store(10));
        assert_eq!(buf.index(), 3);
        let taken = buf.take_extended().unwrap();
        assert_eq!(&taken[..], &[7, 8, 9]);
    }

    #[test]
    fn short_multibyte_read_lands_in_caller_buffer() {
        let mut sink = [0; 2];
        let mut buf = TransferBuffer::new();
        buf.arm_read(&mut sink);

        buf.store(0xAB);
        buf.store(0xCD);
        assert_eq!(buf.small(), [0xAB, 0xCD]);
        buf.finish_read();
        drop(buf);
        assert_eq!(sink, [0xAB, 0xCD]);
    }

    #[test]
    fn take_leaves_write_source_alone() {
        let data = [1, 2, 3];
        let mut buf = TransferBuffer::new();
        buf.arm_write(&data);
        assert!(buf.take_extended().is_none());
        assert_eq!(buf.data(), &data[..]);
    }
}
