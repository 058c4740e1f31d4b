/// Ink mask of a binarized image, one bit per pixel. Rows start on a word
/// boundary so a row can be scanned a word at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitMatrix {
    width: usize,
    height: usize,
    stride: usize,
    words: Vec<u64>,
}

impl BitMatrix {
    /// All-background matrix
    pub fn new(width: usize, height: usize) -> Self {
        let stride = width.div_ceil(64);
        Self {
            width,
            height,
            stride,
            words: vec![0; stride * height],
        }
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn locate(&self, x: usize, y: usize) -> (usize, u64) {
        (y * self.stride + x / 64, 1u64 << (x % 64))
    }

    /// True when (x, y) is ink. Out-of-range reads are background.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let (word, mask) = self.locate(x, y);
        self.words[word] & mask != 0
    }

    /// Same as [`get`](Self::get) for signed coordinates
    #[inline]
    pub fn get_signed(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && self.get(x as usize, y as usize)
    }

    /// Mark (x, y); out-of-range writes are ignored
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let (word, mask) = self.locate(x, y);
        if value {
            self.words[word] |= mask;
        } else {
            self.words[word] &= !mask;
        }
    }

    /// Number of ink pixels
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}
