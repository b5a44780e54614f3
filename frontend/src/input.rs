use std::collections::HashMap;

use marquee_core::core::machine::InputButton;
use sdl2::keyboard::Scancode;

/// Maps SDL scancodes to machine button IDs.
pub struct KeyMap {
    map: HashMap<Scancode, u8>,
}

impl KeyMap {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Bind a scancode to a machine button ID.
    pub fn bind(&mut self, scancode: Scancode, button_id: u8) {
        self.map.insert(scancode, button_id);
    }

    /// Look up the machine button ID for a scancode.
    pub fn get(&self, scancode: Scancode) -> Option<u8> {
        self.map.get(&scancode).copied()
    }
}

/// Build a default key map for a machine's input buttons.
/// Name-based matching keeps the bindings machine-agnostic.
pub fn default_key_map(buttons: &[InputButton]) -> KeyMap {
    let mut km = KeyMap::new();

    for button in buttons {
        let scancode = match button.name {
            // Player 1
            "P1 Left" => Some(Scancode::Left),
            "P1 Right" => Some(Scancode::Right),
            "P1 Up" => Some(Scancode::Up),
            "P1 Down" => Some(Scancode::Down),
            "P1 Start" => Some(Scancode::Num1),

            // Player 2
            "P2 Left" => Some(Scancode::A),
            "P2 Right" => Some(Scancode::D),
            "P2 Up" => Some(Scancode::W),
            "P2 Down" => Some(Scancode::S),
            "P2 Start" => Some(Scancode::Num2),

            // System
            "Coin" => Some(Scancode::Num5),

            _ => None,
        };

        if let Some(sc) = scancode {
            km.bind(sc, button.id);
        }
    }

    km
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_map_binds_known_names() {
        let buttons = [
            InputButton {
                id: 3,
                name: "P1 Left",
            },
            InputButton { id: 9, name: "Coin" },
        ];
        let km = default_key_map(&buttons);
        assert_eq!(km.get(Scancode::Left), Some(3));
        assert_eq!(km.get(Scancode::Num5), Some(9));
        assert_eq!(km.get(Scancode::Space), None);
    }

    #[test]
    fn unknown_names_are_skipped() {
        let buttons = [InputButton {
            id: 1,
            name: "Hyperspace",
        }];
        let km = default_key_map(&buttons);
        assert_eq!(km.get(Scancode::Left), None);
    }
}
