// components/clip.rs
//
// Frame bookkeeping for container nodes. A clip owns an ordered list of
// frames; exactly one is current. Ring surgery (splicing nodes in and out of
// a frame) lives in `core::scene` — this module only tracks frame state and
// the playback cursor.

use crate::api::types::NodeId;

/// One frame of a clip: an intrusive doubly-linked list of child nodes.
/// Iteration order is insertion order; inserts go at the tail.
#[derive(Debug, Clone, Copy, Default)]
pub struct Frame {
    pub(crate) head: Option<NodeId>,
    pub(crate) tail: Option<NodeId>,
}

impl Frame {
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}

/// Playback state of a container node.
///
/// Multi-frame clips behave as flipbook animations: every update tick of a
/// playing clip advances a fractional cursor by `time_scale` and switches the
/// current frame to the truncated index, wrapping to 0 past the end.
#[derive(Debug, Clone)]
pub struct ClipState {
    pub(crate) frames: Vec<Frame>,
    pub(crate) current: usize,
    pub(crate) cursor: f64,
    pub playing: bool,
    /// Frames advanced per logic tick.
    pub time_scale: f64,
}

impl Default for ClipState {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipState {
    /// A clip starts with one empty frame; the frame count never drops to 0.
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::default()],
            current: 0,
            cursor: 0.0,
            playing: true,
            time_scale: 1.0,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn current_frame(&self) -> usize {
        self.current
    }

    pub(crate) fn frame(&self) -> &Frame {
        &self.frames[self.current]
    }

    pub(crate) fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frames[self.current]
    }

    /// Resumes playback.
    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Stops advancing frames; children still update.
    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Advances the playback cursor by one tick.
    pub(crate) fn advance(&mut self) {
        if !self.playing {
            return;
        }

        self.cursor += self.time_scale;
        if self.cursor >= self.frames.len() as f64 {
            self.cursor = 0.0;
        }
        self.current = self.cursor as usize;
    }

    /// Moves the cursor to an exact frame.
    pub(crate) fn seek(&mut self, index: usize) {
        self.current = index;
        self.cursor = index as f64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_one_frame() {
        let clip = ClipState::new();
        assert_eq!(clip.frame_count(), 1);
        assert_eq!(clip.current_frame(), 0);
        assert!(clip.playing);
    }

    #[test]
    fn advance_wraps_to_zero() {
        let mut clip = ClipState::new();
        clip.frames.push(Frame::default());
        clip.frames.push(Frame::default());

        clip.advance();
        assert_eq!(clip.current_frame(), 1);
        clip.advance();
        assert_eq!(clip.current_frame(), 2);
        clip.advance();
        assert_eq!(clip.current_frame(), 0);
    }

    #[test]
    fn fractional_time_scale_holds_frames() {
        let mut clip = ClipState::new();
        clip.frames.push(Frame::default());
        clip.time_scale = 0.5;

        clip.advance();
        assert_eq!(clip.current_frame(), 0);
        clip.advance();
        assert_eq!(clip.current_frame(), 1);
    }

    #[test]
    fn stopped_clip_does_not_advance() {
        let mut clip = ClipState::new();
        clip.frames.push(Frame::default());
        clip.stop();
        clip.advance();
        assert_eq!(clip.current_frame(), 0);
    }
}
