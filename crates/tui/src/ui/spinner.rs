// Codepad - Terminal Code Editor
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Loading spinners
//!
//! Frame-based animations advanced from the event loop's ticker. The AI
//! spinner wraps a [`Spinner`] with the label of the request in flight.

use std::time::{Duration, Instant};

/// A frame-based spinner
#[derive(Debug, Clone)]
pub struct Spinner {
    /// Current frame index
    current_frame: usize,
    /// Animation frames
    frames: &'static [&'static str],
    /// Time between frame updates
    frame_duration: Duration,
    /// Last frame update time
    last_update: Instant,
    /// Whether the spinner is currently active
    active: bool,
}

impl Spinner {
    /// Create a new spinner with the default braille pattern
    pub fn new() -> Self {
        Self::with_frames(SpinnerStyles::BRAILLE)
    }

    /// Create a spinner with custom frames
    pub fn with_frames(frames: &'static [&'static str]) -> Self {
        Self {
            current_frame: 0,
            frames,
            frame_duration: Duration::from_millis(100),
            last_update: Instant::now(),
            active: false,
        }
    }

    /// Create a spinner with custom speed
    pub fn with_speed(mut self, frame_duration: Duration) -> Self {
        self.frame_duration = frame_duration;
        self
    }

    /// Start the spinner animation
    pub fn start(&mut self) {
        self.active = true;
        self.last_update = Instant::now();
    }

    /// Stop the spinner animation
    pub fn stop(&mut self) {
        self.active = false;
        self.current_frame = 0;
    }

    /// Advance the animation if the frame duration has elapsed
    pub fn tick(&mut self) {
        if !self.active || self.frames.is_empty() {
            return;
        }

        let now = Instant::now();
        if now.duration_since(self.last_update) >= self.frame_duration {
            self.current_frame = (self.current_frame + 1) % self.frames.len();
            self.last_update = now;
        }
    }

    /// Current frame, empty while stopped
    pub fn frame(&self) -> &'static str {
        if !self.active || self.frames.is_empty() {
            ""
        } else {
            self.frames[self.current_frame]
        }
    }

    /// Check if the spinner is active
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-defined spinner styles
pub struct SpinnerStyles;

impl SpinnerStyles {
    /// Braille pattern spinner (default)
    pub const BRAILLE: &'static [&'static str] =
        &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

    /// Dots spinner
    pub const DOTS: &'static [&'static str] = &["⠁", "⠂", "⠄", "⡀", "⢀", "⠠", "⠐", "⠈"];

    /// Simple rotating spinner for terminals without braille glyphs
    pub const SIMPLE: &'static [&'static str] = &["|", "/", "-", "\\"];
}

/// Spinner shown while an AI request is in flight
#[derive(Debug, Default)]
pub struct AiSpinner {
    spinner: Spinner,
    /// What the request is doing, e.g. "Thinking..."
    label: Option<String>,
}

impl AiSpinner {
    /// Create an idle spinner
    pub fn new() -> Self {
        Self::default()
    }

    /// Start spinning with `label`
    pub fn start_loading(&mut self, label: &str) {
        self.label = Some(label.to_string());
        self.spinner.start();
    }

    /// Stop spinning
    pub fn finish_loading(&mut self) {
        self.label = None;
        self.spinner.stop();
    }

    /// Update the animation
    pub fn tick(&mut self) {
        self.spinner.tick();
    }

    /// Frame plus label, empty while idle
    pub fn display_text(&self) -> String {
        match &self.label {
            Some(label) => format!("{} {}", self.spinner.frame(), label),
            None => String::new(),
        }
    }

    /// Whether a request is in flight
    pub fn is_loading(&self) -> bool {
        self.label.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_frames_only_while_active() {
        let mut spinner = Spinner::with_frames(SpinnerStyles::SIMPLE).with_speed(Duration::ZERO);
        assert_eq!(spinner.frame(), "");

        spinner.start();
        assert_eq!(spinner.frame(), "|");
        spinner.tick();
        assert_eq!(spinner.frame(), "/");

        spinner.stop();
        assert!(!spinner.is_active());
        assert_eq!(spinner.frame(), "");
    }

    #[test]
    fn test_ai_spinner_label() {
        let mut spinner = AiSpinner::new();
        assert!(spinner.display_text().is_empty());

        spinner.start_loading("Thinking...");
        assert!(spinner.is_loading());
        assert!(spinner.display_text().ends_with(" Thinking..."));

        spinner.finish_loading();
        assert!(!spinner.is_loading());
        assert!(spinner.display_text().is_empty());
    }
}
