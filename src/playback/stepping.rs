//! The frame transition function.

use super::core::PlaybackCore;
use super::morph::{is_out_of_range, morph_unit, MorphSplit};
use super::state::ReplayMode;

impl PlaybackCore {
    /// Advance one step in `direction` (`+1` / `-1`), relative to the
    /// current bounce direction.
    ///
    /// Returns `false` without touching state when the replay mode allows
    /// no further movement.
    pub(crate) fn step(&mut self, direction: isize) -> bool {
        let step = self.state.frame_step
            * direction
            * self.state.current_direction.sign();
        if step == 0 {
            return false;
        }

        let this_frame = self.state.current_frame.map_or(-1, |f| f as isize);
        let mut next_frame = this_frame + step;
        let morphing = self.state.morph_count > 0;
        let unit = morph_unit(self.state.morph_count);
        let mut next_morph = self.state.morph_position + step as f32 * unit;

        let (first, last) = (self.state.first_frame, self.state.last_frame);
        let out_of_range = if morphing {
            is_out_of_range(next_morph, first, last)
        } else {
            let (lo, hi) = self.state.range_bounds();
            next_frame < lo as isize || next_frame > hi as isize
        };

        if out_of_range {
            match self.state.replay_mode {
                ReplayMode::Once => return false,
                ReplayMode::Loop => {
                    let target = if self.state.base_direction
                        == self.state.current_direction
                    {
                        first
                    } else {
                        last
                    };
                    next_frame = target as isize;
                    next_morph = target as f32;
                }
                ReplayMode::Palindrome => {
                    self.state.current_direction =
                        self.state.current_direction.flipped();
                    next_frame -= 2 * step;
                    next_morph -= 2.0 * step as f32 * unit;
                }
            }
        }

        if morphing {
            self.morph_to(next_morph);
            return true;
        }
        if next_frame < 0 || next_frame as usize >= self.frame_count() {
            return false;
        }
        self.set_frame(next_frame as usize);
        true
    }

    /// Move to a fractional position, interpolating between its bounding
    /// models when it is not on a whole frame.
    fn morph_to(&mut self, position: f32) {
        let split = MorphSplit::new(position);
        if split.base >= 0 {
            self.set_frame(split.base as usize);
        }
        self.state.morph_position = split.position;
        if !split.needs_interpolation() {
            return;
        }
        let next = split.next as usize;
        if next >= self.frame_count() {
            return;
        }
        let models = (
            self.state.model_for_frame(split.base as usize),
            self.state.model_for_frame(next),
        );
        if let (Some(a), Some(b)) = models {
            self.interpolator.interpolate(a, b, split.fraction);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::state::Direction;
    use super::super::test_support::Fixture;
    use super::*;

    fn once_at(frame: usize, mode: ReplayMode) -> Fixture {
        let fx = Fixture::new(5);
        fx.update(|core| {
            core.set_range(None, None);
            core.state.replay_mode = mode;
            core.set_frame(frame);
        });
        fx
    }

    #[test]
    fn once_stops_at_the_end_without_mutation() {
        let fx = once_at(4, ReplayMode::Once);
        let selections_before = fx.host.selections().len();
        assert!(!fx.update(|core| core.step(1)));
        fx.read(|core| {
            assert_eq!(core.state.current_frame, Some(4));
            assert_eq!(core.state.current_direction, Direction::Forward);
        });
        assert_eq!(fx.host.selections().len(), selections_before);
    }

    #[test]
    fn once_advances_inside_the_range() {
        let fx = once_at(1, ReplayMode::Once);
        assert!(fx.update(|core| core.step(1)));
        assert_eq!(fx.read(|core| core.state.current_frame), Some(2));
        assert_eq!(fx.host.selections().last(), Some(&Some(2)));
    }

    #[test]
    fn loop_wraps_to_first() {
        let fx = once_at(4, ReplayMode::Loop);
        assert!(fx.update(|core| core.step(1)));
        assert_eq!(fx.read(|core| core.state.current_frame), Some(0));
    }

    #[test]
    fn loop_after_reverse_wraps_to_last() {
        let fx = once_at(0, ReplayMode::Loop);
        fx.update(|core| {
            core.state.current_direction = Direction::Backward;
        });
        assert!(fx.update(|core| core.step(1)));
        assert_eq!(fx.read(|core| core.state.current_frame), Some(4));
    }

    #[test]
    fn palindrome_bounces_back_two_units() {
        let fx = once_at(4, ReplayMode::Palindrome);
        assert!(fx.update(|core| core.step(1)));
        fx.read(|core| {
            assert_eq!(core.state.current_direction, Direction::Backward);
            assert_eq!(core.state.current_frame, Some(3));
        });
        assert!(fx.update(|core| core.step(1)));
        assert_eq!(fx.read(|core| core.state.current_frame), Some(2));
    }

    #[test]
    fn palindrome_bounces_at_the_start_too() {
        let fx = once_at(4, ReplayMode::Palindrome);
        fx.update(|core| core.set_frame(0));
        fx.update(|core| {
            core.state.current_direction = Direction::Backward;
        });
        assert!(fx.update(|core| core.step(1)));
        fx.read(|core| {
            assert_eq!(core.state.current_direction, Direction::Forward);
            assert_eq!(core.state.current_frame, Some(1));
        });
    }

    #[test]
    fn descending_range_steps_downward() {
        let fx = Fixture::new(10);
        fx.update(|core| core.set_range(Some(12), Some(3)));
        fx.read(|core| {
            assert_eq!(core.state.frame_step, -1);
            assert_eq!(core.state.current_frame, Some(9));
        });
        assert!(fx.update(|core| core.step(1)));
        assert_eq!(fx.read(|core| core.state.current_frame), Some(8));
        assert!(fx.update(|core| core.step(-1)));
        assert_eq!(fx.read(|core| core.state.current_frame), Some(9));
    }

    #[test]
    fn empty_range_cannot_step() {
        let fx = Fixture::new(10);
        fx.update(|core| core.set_range(Some(3), Some(3)));
        assert_eq!(fx.read(|core| core.state.frame_step), 0);
        assert!(!fx.update(|core| core.step(1)));
    }

    #[test]
    fn morph_landing_on_whole_frame_skips_interpolation() {
        let fx = Fixture::new(5);
        fx.update(|core| {
            core.set_range(None, None);
            core.set_morph_count(3);
            core.state.morph_position = 0.75;
        });
        assert!(fx.update(|core| core.step(1)));
        fx.read(|core| {
            assert_eq!(core.state.current_frame, Some(1));
            assert_eq!(core.state.morph_position, 1.0);
        });
        assert!(fx.interpolator.calls().is_empty());
    }

    #[test]
    fn morph_between_frames_interpolates() {
        let fx = Fixture::new(5);
        fx.update(|core| {
            core.set_range(None, None);
            core.set_morph_count(1);
        });
        assert!(fx.update(|core| core.step(1)));
        fx.read(|core| {
            assert_eq!(core.state.current_frame, Some(0));
            assert_eq!(core.state.morph_position, 0.5);
        });
        assert_eq!(fx.interpolator.calls(), vec![(0, 1, 0.5)]);
    }

    #[test]
    fn morph_palindrome_reverses_smoothly() {
        let fx = Fixture::new(3);
        fx.update(|core| {
            core.set_range(None, None);
            core.state.replay_mode = ReplayMode::Palindrome;
            core.set_morph_count(1);
            core.set_frame(2);
            core.state.morph_position = 2.0;
        });
        assert!(fx.update(|core| core.step(1)));
        fx.read(|core| {
            assert_eq!(core.state.current_direction, Direction::Backward);
            assert_eq!(core.state.morph_position, 1.5);
            assert_eq!(core.state.current_frame, Some(1));
        });
        assert_eq!(fx.interpolator.calls(), vec![(1, 2, 0.5)]);
    }

    #[test]
    fn morph_once_stops_past_the_last_frame() {
        let fx = Fixture::new(3);
        fx.update(|core| {
            core.set_range(None, None);
            core.set_morph_count(1);
            core.state.morph_position = 2.0;
        });
        assert!(!fx.update(|core| core.step(1)));
    }

    #[test]
    fn host_failure_still_advances_pointer() {
        let fx = once_at(1, ReplayMode::Once);
        fx.host.fail_selections(true);
        assert!(fx.update(|core| core.step(1)));
        assert_eq!(fx.read(|core| core.state.current_frame), Some(2));
    }

    #[test]
    fn movie_steps_through_the_map() {
        let fx = Fixture::new(6);
        fx.update(|core| core.set_movie(Some(vec![6, 2, 4]), 0));
        assert_eq!(fx.read(|core| core.state.current_model), Some(5));
        assert!(fx.update(|core| core.step(1)));
        fx.read(|core| {
            assert_eq!(core.state.current_frame, Some(1));
            assert_eq!(core.state.current_model, Some(1));
        });
    }
}
