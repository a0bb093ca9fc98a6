/// Half-open byte window `[start, end)` inside the image buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Range(pub usize, pub usize);

impl Range {
	pub fn with_len(start: usize, len: usize) -> Range {
		Range(start, start + len)
	}

	pub fn len(&self) -> usize {
		self.1 - self.0
	}

	/// Slice the window out of `data`, or `None` if it runs past the end.
	pub fn slice<'a>(&self, data: &'a [u8]) -> Option<&'a [u8]> {
		data.get(self.0..self.1)
	}
}
