//! Capture buffers and the finalized upload blob
//!
//! A recording take accumulates encoded chunks in an `AudioCapture`; when
//! recording stops the chunks are concatenated into a single `AudioBlob`
//! for upload and discarded afterwards.

/// Chunks collected during one recording take
#[derive(Debug, Clone)]
pub struct AudioCapture {
    chunks: Vec<Vec<u8>>,
    mime_type: String,
}

impl AudioCapture {
    pub fn new(mime_type: impl Into<String>) -> Self {
        Self {
            chunks: Vec::new(),
            mime_type: mime_type.into(),
        }
    }

    /// Append a chunk; empty chunks are dropped
    pub fn push_chunk(&mut self, chunk: Vec<u8>) {
        if !chunk.is_empty() {
            self.chunks.push(chunk);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Total bytes across all chunks
    pub fn byte_len(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Concatenate the chunks into the single blob uploaded to the backend
    pub fn finalize(self) -> AudioBlob {
        let mut bytes = Vec::with_capacity(self.byte_len());
        for chunk in &self.chunks {
            bytes.extend_from_slice(chunk);
        }
        AudioBlob {
            bytes,
            mime_type: self.mime_type,
        }
    }
}

/// A finished recording, ready for upload
#[derive(Debug, Clone)]
pub struct AudioBlob {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl AudioBlob {
    /// Upload filename derived from the mime type
    pub fn file_name(&self) -> &'static str {
        match self.mime_type.as_str() {
            "audio/wav" => "recording.wav",
            "audio/webm" => "recording.webm",
            _ => "recording.bin",
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }
}
