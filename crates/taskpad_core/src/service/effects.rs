//! Completion side effects (sound, celebration) driven by task events.

use crate::service::task_list::TaskEvent;
use log::warn;
use std::sync::mpsc::Receiver;

/// Presentation-side collaborators fired when a task gets completed.
pub trait CompletionEffects {
    /// Plays the completion clip. Errors are logged and swallowed.
    fn play_sound(&mut self) -> Result<(), String>;
    /// Starts the visual celebration (confetti, haptics).
    fn trigger_celebration(&mut self);
}

/// Drains pending events and fires effects once per completion.
///
/// Returns how many completions were handled.
pub fn dispatch_completion_effects(
    events: &Receiver<TaskEvent>,
    effects: &mut impl CompletionEffects,
) -> usize {
    let mut handled = 0;
    for event in events.try_iter() {
        match event {
            TaskEvent::Completed { id, .. } => {
                if let Err(err) = effects.play_sound() {
                    warn!("event=completion_sound module=effects status=error id={id} error={err}");
                }
                effects.trigger_celebration();
                handled += 1;
            }
        }
    }
    handled
}

#[cfg(test)]
mod tests {
    use super::{dispatch_completion_effects, CompletionEffects};
    use crate::service::task_list::TaskEvent;
    use std::sync::mpsc::channel;

    #[derive(Default)]
    struct Recorder {
        sounds: usize,
        celebrations: usize,
        fail_sound: bool,
    }

    impl CompletionEffects for Recorder {
        fn play_sound(&mut self) -> Result<(), String> {
            self.sounds += 1;
            if self.fail_sound {
                Err("audio device busy".to_string())
            } else {
                Ok(())
            }
        }

        fn trigger_celebration(&mut self) {
            self.celebrations += 1;
        }
    }

    fn completed(id: &str) -> TaskEvent {
        TaskEvent::Completed {
            id: id.to_string(),
            title: String::new(),
        }
    }

    #[test]
    fn fires_both_effects_per_completion() {
        let (sender, receiver) = channel();
        sender.send(completed("a")).unwrap();
        sender.send(completed("b")).unwrap();

        let mut recorder = Recorder::default();
        assert_eq!(dispatch_completion_effects(&receiver, &mut recorder), 2);
        assert_eq!(recorder.sounds, 2);
        assert_eq!(recorder.celebrations, 2);
        assert_eq!(dispatch_completion_effects(&receiver, &mut recorder), 0);
    }

    #[test]
    fn sound_failure_does_not_block_celebration() {
        let (sender, receiver) = channel();
        sender.send(completed("a")).unwrap();

        let mut recorder = Recorder {
            fail_sound: true,
            ..Recorder::default()
        };
        assert_eq!(dispatch_completion_effects(&receiver, &mut recorder), 1);
        assert_eq!(recorder.celebrations, 1);
    }
}
