/// Keyboard to [`Action`] mapping
///
/// Shift selects rotation: Shift+Left/Right turn about y, Shift+Up/Down
/// about x and Shift+A/D about z. Without Shift the arrows move along x/y
/// and W/S along z.
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use kframe_core::{Action, Axis, SimulationConfig};

/// Step sizes bound to each key
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyBindings {
    pub rotation_step: f64,
    pub translation_step: f64,
    pub scale_down: f64,
    pub scale_up: f64,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

impl KeyBindings {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            rotation_step: config.rotation_step,
            translation_step: config.translation_step,
            scale_down: config.scale_down,
            scale_up: config.scale_up,
        }
    }

    /// The action bound to `event`, if any. Key releases are ignored.
    pub fn action_for(&self, event: &KeyEvent) -> Option<Action> {
        if event.kind == KeyEventKind::Release {
            return None;
        }

        // Terminals report Shift+letter as an uppercase char, sometimes
        // without the modifier bit
        let shifted = event.modifiers.contains(KeyModifiers::SHIFT)
            || matches!(event.code, KeyCode::Char(c) if c.is_ascii_uppercase());
        let code = match event.code {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        };

        match code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('p') => Some(Action::Play),
            KeyCode::Char('1') => Some(Action::Record { slot: 0 }),
            KeyCode::Char('2') => Some(Action::Record { slot: 1 }),
            _ if shifted => self.rotation(code),
            KeyCode::Char('n') => Some(Action::Scale {
                factor: self.scale_down,
            }),
            KeyCode::Char('m') => Some(Action::Scale {
                factor: self.scale_up,
            }),
            _ => self.translation(code),
        }
    }

    fn rotation(&self, code: KeyCode) -> Option<Action> {
        let step = self.rotation_step;
        let (axis, angle) = match code {
            KeyCode::Left => (Axis::Y, -step),
            KeyCode::Right => (Axis::Y, step),
            KeyCode::Up => (Axis::X, -step),
            KeyCode::Down => (Axis::X, step),
            KeyCode::Char('a') => (Axis::Z, -step),
            KeyCode::Char('d') => (Axis::Z, step),
            _ => return None,
        };
        Some(Action::Rotate { axis, angle })
    }

    fn translation(&self, code: KeyCode) -> Option<Action> {
        let step = self.translation_step;
        let (axis, step) = match code {
            KeyCode::Left => (Axis::X, -step),
            KeyCode::Right => (Axis::X, step),
            KeyCode::Up => (Axis::Y, step),
            KeyCode::Down => (Axis::Y, -step),
            KeyCode::Char('w') => (Axis::Z, step),
            KeyCode::Char('s') => (Axis::Z, -step),
            _ => return None,
        };
        Some(Action::Translate {
            axis: axis.index(),
            step,
        })
    }
}

/// True for the keys that cancel a running playback
pub fn is_cancel(event: &KeyEvent) -> bool {
    event.kind != KeyEventKind::Release
        && matches!(
            event.code,
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q')
        )
}
