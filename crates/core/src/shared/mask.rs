/// One membership flag per pixel, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    bits: Vec<bool>,
    width: u32,
    height: u32,
}

impl Mask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            bits: vec![false; (width as usize) * (height as usize)],
            width,
            height,
        }
    }

    /// Every pixel set.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            bits: vec![true; (width as usize) * (height as usize)],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.bits[y * self.width as usize + x]
    }

    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        let w = self.width as usize;
        self.bits[y * w + x] = value;
    }

    pub fn get_index(&self, index: usize) -> bool {
        self.bits[index]
    }

    pub fn set_index(&mut self, index: usize, value: bool) {
        self.bits[index] = value;
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.bits.iter().any(|&b| b)
    }
}
