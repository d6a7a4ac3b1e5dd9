//! Which models the renderer should draw.

use std::collections::BTreeSet;

use super::core::PlaybackCore;

impl PlaybackCore {
    /// Recompute the visible model set from the selection and range.
    ///
    /// A single selected frame shows just that model (plus the background
    /// model). Otherwise every primary model in the range is shown; the
    /// last frame is forced in when the range is a single frame, when it is
    /// primary, or when nothing else qualified. A range that ends up
    /// showing exactly one model is promoted to a single-frame selection.
    pub(crate) fn refresh_visible(&mut self) -> &BTreeSet<usize> {
        let mut visible = BTreeSet::new();
        if let Some(background) = self.state.background_model {
            let _ = visible.insert(background);
        }
        if self.state.current_frame.is_some() {
            if let Some(model) = self.state.current_model {
                let _ = visible.insert(model);
            }
            self.state.visible_models = visible;
            return &self.state.visible_models;
        }

        let frame_count = self.frame_count();
        if frame_count == 0 {
            self.state.visible_models = visible;
            return &self.state.visible_models;
        }

        let (first, last) = (self.state.first_frame, self.state.last_frame);
        let step = self.state.frame_step;
        let mut displayed = 0;
        let mut frame_displayed = first;
        if step != 0 {
            let mut frame = first as isize;
            while frame != last as isize
                && frame >= 0
                && (frame as usize) < frame_count
            {
                let ordinal = frame as usize;
                if let Some(model) = self.primary_model(ordinal) {
                    let _ = visible.insert(model);
                    displayed += 1;
                    frame_displayed = ordinal;
                }
                frame += step;
            }
        }

        let last_model = self.state.model_for_frame(last);
        let last_is_primary =
            last_model.is_some_and(|m| !self.source.is_auxiliary_frame(m));
        if first == last || last_is_primary || displayed == 0 {
            if let Some(model) = last_model {
                let _ = visible.insert(model);
            }
            if displayed == 0 {
                self.state.first_frame = last;
            }
            displayed = 0;
        }
        self.state.visible_models = visible;

        if displayed == 1 {
            self.set_frame(frame_displayed);
        }
        &self.state.visible_models
    }

    /// Model index for `ordinal` unless it is an auxiliary data frame.
    fn primary_model(&self, ordinal: usize) -> Option<usize> {
        self.state
            .model_for_frame(ordinal)
            .filter(|&m| !self.source.is_auxiliary_frame(m))
    }
}
