//! Secret stream holding the substitute bytes used during degradation.

use secrecy::{ExposeSecret, SecretBox};

use crate::error::Error;

/// Secret stream supplying substitute bytes during degradation.
///
/// The bytes are zeroized on drop and never shown by `Debug`. Each block
/// borrows a fixed-width window; windows are taken in block order and wrap
/// around when the stream is shorter than the file needs.
pub struct SecretStream {
    inner: SecretBox<Vec<u8>>,
}

impl SecretStream {
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self { inner: SecretBox::new(Box::new(data)) }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.expose_secret().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.expose_secret().is_empty()
    }

    /// Checks that every block can borrow `width` distinct stream bytes.
    pub fn ensure_width(&self, width: usize) -> Result<(), Error> {
        if self.is_empty() {
            return Err(Error::EmptySecret);
        }

        if self.len() < width {
            return Err(Error::SecretTooShort { required: width, actual: self.len() });
        }

        Ok(())
    }

    /// Returns the `width` bytes lent to block `index`.
    ///
    /// Block `i` starts at `i * width` modulo the stream length. The window
    /// borrows the stream, so no secret byte leaves the zeroizing box.
    pub fn window(&self, index: usize, width: usize) -> SecretWindow<'_> {
        let bytes = self.inner.expose_secret();
        if bytes.is_empty() {
            return SecretWindow::new(bytes, 0, 0);
        }

        let start = ((index as u128 * width as u128) % bytes.len() as u128) as usize;
        SecretWindow::new(bytes, start, width)
    }
}

impl std::fmt::Debug for SecretStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretStream([... {} bytes ...])", self.len())
    }
}

/// Borrowed, wrapping view of `width` secret bytes.
#[derive(Clone, Copy)]
pub struct SecretWindow<'a> {
    bytes: &'a [u8],
    start: usize,
    width: usize,
}

impl<'a> SecretWindow<'a> {
    /// Views `width` bytes of `bytes` starting at `start`, wrapping at the end.
    pub fn new(bytes: &'a [u8], start: usize, width: usize) -> Self {
        if bytes.is_empty() {
            return Self { bytes, start: 0, width: 0 };
        }

        Self { bytes, start: start % bytes.len(), width }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0
    }

    /// Byte at `offset` inside the window, `None` past its end.
    #[inline]
    pub fn get(&self, offset: usize) -> Option<u8> {
        (offset < self.width).then(|| self.bytes[(self.start + offset % self.bytes.len()) % self.bytes.len()])
    }
}

impl std::fmt::Debug for SecretWindow<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretWindow([... {} bytes ...])", self.width)
    }
}
