/*!
RAM module: flat byte stores backing the WRAM and SRAM regions.

WRAM is fixed at 128 KiB. SRAM is sized from the cartridge header's RAM
size byte and may be zero bytes for cartridges without save RAM.

Out-of-range accesses are soft: reads return 0, writes are dropped, and
a diagnostic is emitted. The decoder's translated offsets stay in range
for correctly sized stores, so these paths only fire when a cartridge
declares less SRAM than its code addresses.
*/

/// Size of console work RAM (in bytes).
pub const WRAM_SIZE: usize = 128 * 1024;

/// Flat byte-array store used for both WRAM and SRAM.
#[derive(Debug)]
pub struct Ram {
    label: &'static str,
    data: Vec<u8>,
}

impl Ram {
    /// Create a store of `size` bytes initialized to 0.
    pub fn new(label: &'static str, size: usize) -> Self {
        Self {
            label,
            data: vec![0; size],
        }
    }

    /// Create the fixed-size work RAM.
    #[inline]
    pub fn wram() -> Self {
        Self::new("wram", WRAM_SIZE)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Read a byte at a translated offset.
    #[inline]
    pub fn read(&self, offset: u32) -> u8 {
        match self.data.get(offset as usize) {
            Some(&b) => b,
            None => {
                eprintln!(
                    "{}: read past end (offset 0x{:05X}, size 0x{:05X})",
                    self.label,
                    offset,
                    self.data.len()
                );
                0
            }
        }
    }

    /// Write a byte at a translated offset.
    #[inline]
    pub fn write(&mut self, offset: u32, value: u8) {
        let len = self.data.len();
        match self.data.get_mut(offset as usize) {
            Some(b) => *b = value,
            None => {
                eprintln!(
                    "{}: write past end (offset 0x{:05X}, size 0x{:05X})",
                    self.label, offset, len
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wram_is_128k() {
        let wram = Ram::wram();
        assert_eq!(wram.len(), 0x20000);
    }

    #[test]
    fn read_write_round_trip() {
        let mut ram = Ram::new("sram", 0x800);
        ram.write(0x7FF, 0xAB);
        assert_eq!(ram.read(0x7FF), 0xAB);
        assert_eq!(ram.read(0x000), 0x00);
    }

    #[test]
    fn out_of_range_access_is_soft() {
        let mut ram = Ram::new("sram", 0x10);
        ram.write(0x20, 0xFF);
        assert_eq!(ram.read(0x20), 0);
        // Store unchanged.
        assert_eq!(ram.read(0x0F), 0);
    }

    #[test]
    fn zero_sized_store_reads_zero() {
        let ram = Ram::new("sram", 0);
        assert!(ram.is_empty());
        assert_eq!(ram.read(0), 0);
    }
}
