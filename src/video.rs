//! The streaming video texture behind the marquee surfaces.
//!
//! A [`VideoTexture`] pairs a GPU [`Texture`] with a [`FrameSource`] that
//! produces RGBA frames over time. The scene samples the texture like any
//! other color map; the pixels change underneath it as the source advances.
//!
//! Two sources ship with the crate: [`ImageSequence`] plays a directory of
//! decoded image frames at a fixed rate, and [`TestPattern`] synthesizes an
//! animated LCD-style pattern so the vignette runs without any assets.

use crate::gpu::GpuContext;
use crate::texture::Texture;

/// Playback configuration for a video texture.
#[derive(Clone, Copy, Debug)]
pub struct VideoConfig {
    /// Restart from the first frame after the last.
    pub looping: bool,
    /// Start playing immediately on creation.
    pub autoplay: bool,
    /// No audio pipeline exists in this crate; the flag is carried so a
    /// source that gains one keeps the same configuration surface.
    pub muted: bool,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            looping: true,
            autoplay: true,
            muted: true,
        }
    }
}

/// Produces RGBA frames over time.
///
/// `advance` is called once per rendered frame with the elapsed time; it
/// returns a new frame when one is due (including on the very first call)
/// and `None` otherwise. Implementations own their pacing.
pub trait FrameSource {
    /// Frame dimensions in pixels; constant over the source's lifetime.
    fn dimensions(&self) -> (u32, u32);

    /// Advances the source clock by `dt` seconds and returns the next
    /// frame's pixels if one is due.
    fn advance(&mut self, dt: f32) -> Option<&[u8]>;
}

/// Errors from building an [`ImageSequence`].
#[derive(Debug)]
pub enum VideoError {
    /// Directory could not be read.
    Io(std::io::Error),
    /// A frame file failed to decode.
    Decode(String),
    /// The source contained no frames.
    Empty,
    /// Frames did not all share the same dimensions.
    DimensionMismatch,
}

impl std::fmt::Display for VideoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoError::Io(e) => write!(f, "IO error: {}", e),
            VideoError::Decode(msg) => write!(f, "decode error: {}", msg),
            VideoError::Empty => write!(f, "video source has no frames"),
            VideoError::DimensionMismatch => write!(f, "video frames differ in size"),
        }
    }
}

impl std::error::Error for VideoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VideoError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for VideoError {
    fn from(e: std::io::Error) -> Self {
        VideoError::Io(e)
    }
}

/// A clip of pre-decoded RGBA frames played at a fixed rate.
pub struct ImageSequence {
    frames: Vec<Vec<u8>>,
    width: u32,
    height: u32,
    fps: f32,
    looping: bool,
    clock: f32,
    next_frame_at: f32,
    cursor: usize,
    exhausted: bool,
}

impl ImageSequence {
    /// Builds a sequence from raw RGBA frames.
    ///
    /// Every frame must be `width × height × 4` bytes.
    pub fn from_frames(
        frames: Vec<Vec<u8>>,
        width: u32,
        height: u32,
        fps: f32,
    ) -> Result<Self, VideoError> {
        if frames.is_empty() {
            return Err(VideoError::Empty);
        }
        let expected = (width * height * 4) as usize;
        if frames.iter().any(|f| f.len() != expected) {
            return Err(VideoError::DimensionMismatch);
        }
        Ok(Self {
            frames,
            width,
            height,
            fps,
            looping: true,
            clock: 0.0,
            next_frame_at: 0.0,
            cursor: 0,
            exhausted: false,
        })
    }

    /// Loads every image file in a directory, sorted by file name, and
    /// decodes them to RGBA.
    pub fn load_dir(path: impl AsRef<std::path::Path>, fps: f32) -> Result<Self, VideoError> {
        let mut entries: Vec<_> = std::fs::read_dir(path)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect();
        entries.sort();

        let mut frames = Vec::with_capacity(entries.len());
        let mut dims = None;
        for entry in &entries {
            let img = image::open(entry)
                .map_err(|e| VideoError::Decode(format!("{}: {}", entry.display(), e)))?
                .to_rgba8();
            let (w, h) = img.dimensions();
            match dims {
                None => dims = Some((w, h)),
                Some(d) if d != (w, h) => return Err(VideoError::DimensionMismatch),
                Some(_) => {}
            }
            frames.push(img.into_raw());
        }

        let (width, height) = dims.ok_or(VideoError::Empty)?;
        Self::from_frames(frames, width, height, fps)
    }

    /// Sets whether playback wraps after the last frame.
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }
}

impl FrameSource for ImageSequence {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn advance(&mut self, dt: f32) -> Option<&[u8]> {
        if self.exhausted {
            return None;
        }
        self.clock += dt;
        if self.clock < self.next_frame_at {
            return None;
        }
        self.next_frame_at = self.clock + 1.0 / self.fps;

        let frame = self.cursor;
        if self.cursor + 1 < self.frames.len() {
            self.cursor += 1;
        } else if self.looping {
            self.cursor = 0;
        } else {
            self.exhausted = true;
        }
        Some(&self.frames[frame])
    }
}

/// A procedural stand-in clip: drifting color bands over hash noise, with
/// scanline darkening for an LCD look.
pub struct TestPattern {
    width: u32,
    height: u32,
    fps: f32,
    clock: f32,
    next_frame_at: f32,
    pixels: Vec<u8>,
}

impl TestPattern {
    /// A pattern at the given resolution, rendered at 30 fps.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            fps: 30.0,
            clock: 0.0,
            next_frame_at: 0.0,
            pixels: vec![0; (width * height * 4) as usize],
        }
    }

    fn hash(x: u32, y: u32, seed: u32) -> u32 {
        let mut h = seed;
        h = h.wrapping_add(x.wrapping_mul(374_761_393));
        h = h.wrapping_add(y.wrapping_mul(668_265_263));
        h ^= h >> 13;
        h = h.wrapping_mul(1_274_126_177);
        h ^= h >> 16;
        h
    }

    fn render(&mut self, time: f32) {
        const BANDS: &[[u8; 3]] = &[
            [235, 80, 52],
            [52, 120, 235],
            [240, 200, 60],
            [60, 220, 160],
            [200, 70, 200],
            [240, 240, 240],
        ];
        let band_width = (self.width / BANDS.len() as u32).max(1);
        let drift = (time * 40.0) as u32;

        for y in 0..self.height {
            let scanline = if y % 2 == 0 { 0 } else { 40 };
            for x in 0..self.width {
                let idx = ((y * self.width + x) * 4) as usize;
                let band = (((x + drift) / band_width) % BANDS.len() as u32) as usize;
                let base = BANDS[band];
                let grain = (Self::hash(x, y, drift) % 24) as i32 - 12;

                self.pixels[idx] = (base[0] as i32 + grain - scanline).clamp(0, 255) as u8;
                self.pixels[idx + 1] = (base[1] as i32 + grain - scanline).clamp(0, 255) as u8;
                self.pixels[idx + 2] = (base[2] as i32 + grain - scanline).clamp(0, 255) as u8;
                self.pixels[idx + 3] = 255;
            }
        }
    }
}

impl FrameSource for TestPattern {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn advance(&mut self, dt: f32) -> Option<&[u8]> {
        self.clock += dt;
        if self.clock < self.next_frame_at {
            return None;
        }
        self.next_frame_at = self.clock + 1.0 / self.fps;
        let time = self.clock;
        self.render(time);
        Some(&self.pixels)
    }
}

/// A GPU texture whose pixels follow a [`FrameSource`] over time.
///
/// Usable as a material map immediately after creation (the first frame is
/// uploaded eagerly) and updated in place as the source produces frames.
/// The rest of the crate only ever samples it.
pub struct VideoTexture {
    texture: Texture,
    source: Box<dyn FrameSource>,
    playing: bool,
}

impl VideoTexture {
    /// Wraps a frame source in a GPU texture, uploading the first frame.
    pub fn new(gpu: &GpuContext, mut source: Box<dyn FrameSource>, config: VideoConfig) -> Self {
        let (width, height) = source.dimensions();
        let texture = Texture::new_streaming(gpu, width, height, "Video Texture");
        if let Some(frame) = source.advance(0.0) {
            texture.write_rgba(gpu, frame);
        }
        Self {
            texture,
            source,
            playing: config.autoplay,
        }
    }

    /// Advances playback and uploads a new frame if one came due.
    pub fn update(&mut self, gpu: &GpuContext, dt: f32) {
        if !self.playing {
            return;
        }
        if let Some(frame) = self.source.advance(dt) {
            self.texture.write_rgba(gpu, frame);
        }
    }

    /// Resumes playback.
    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Freezes playback on the current frame.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Whether the clock is advancing.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// The sampleable texture.
    pub fn texture(&self) -> &Texture {
        &self.texture
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba_frame(value: u8) -> Vec<u8> {
        vec![value; 2 * 2 * 4]
    }

    #[test]
    fn config_defaults_match_playback_expectations() {
        let config = VideoConfig::default();
        assert!(config.looping);
        assert!(config.autoplay);
        assert!(config.muted);
    }

    #[test]
    fn test_pattern_produces_a_frame_immediately_then_paces() {
        let mut pattern = TestPattern::new(8, 4);
        assert!(pattern.advance(0.0).is_some());
        assert!(pattern.advance(0.001).is_none());
        assert!(pattern.advance(1.0 / 30.0).is_some());
    }

    #[test]
    fn test_pattern_frames_are_opaque() {
        let mut pattern = TestPattern::new(8, 4);
        let frame = pattern.advance(0.0).unwrap();
        for px in frame.chunks(4) {
            assert_eq!(px[3], 255);
        }
    }

    #[test]
    fn sequence_wraps_when_looping() {
        let frames = vec![rgba_frame(0), rgba_frame(1), rgba_frame(2)];
        let mut seq = ImageSequence::from_frames(frames, 2, 2, 10.0).unwrap();

        let mut seen = Vec::new();
        for _ in 0..5 {
            if let Some(frame) = seq.advance(0.1) {
                seen.push(frame[0]);
            }
        }
        assert_eq!(seen, vec![0, 1, 2, 0, 1]);
    }

    #[test]
    fn sequence_halts_on_last_frame_without_looping() {
        let frames = vec![rgba_frame(0), rgba_frame(1)];
        let mut seq = ImageSequence::from_frames(frames, 2, 2, 10.0)
            .unwrap()
            .looping(false);

        assert_eq!(seq.advance(0.1).unwrap()[0], 0);
        assert_eq!(seq.advance(0.1).unwrap()[0], 1);
        assert!(seq.advance(0.1).is_none());
        assert!(seq.advance(10.0).is_none());
    }

    #[test]
    fn sequence_rejects_mismatched_frames() {
        let frames = vec![rgba_frame(0), vec![0; 12]];
        assert!(matches!(
            ImageSequence::from_frames(frames, 2, 2, 10.0),
            Err(VideoError::DimensionMismatch)
        ));
    }

    #[test]
    fn empty_sequence_is_rejected() {
        assert!(matches!(
            ImageSequence::from_frames(Vec::new(), 2, 2, 10.0),
            Err(VideoError::Empty)
        ));
    }
}
