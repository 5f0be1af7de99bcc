use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Screen, SetupField};

#[derive(Debug, Clone, Copy)]
pub(crate) enum Action {
    None,
    Quit,
    /// Validate the form, build the reader, and run the first refresh.
    ApplySetup,
    /// Refresh the schedule snapshot (a no-op within the same day).
    RefreshSchedule,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Backspace, Char, Down, Enter, Esc, Left, Tab, Up};

    // Global quit shortcuts
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    if key.code == Char('q') && key.modifiers.is_empty() {
        return Action::Quit;
    }

    let mut action = Action::None;

    match app.screen {
        Screen::Setup => match key.code {
            Tab => {
                app.focus_next();
            }
            Up => {
                if app.focus == SetupField::Resources && app.resource_index > 0 {
                    app.resource_index -= 1;
                }
            }
            Down => {
                if app.focus == SetupField::Resources
                    && app.resource_index + 1 < app.resource_keys.len()
                {
                    app.resource_index += 1;
                }
            }
            Char(' ') => {
                if app.focus == SetupField::Resources {
                    app.toggle_current_resource();
                }
            }
            Char(character) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT)
                {
                    match app.focus {
                        // Dutch postcodes are written uppercase
                        SetupField::Postcode => {
                            app.postcode_input.extend(character.to_uppercase());
                        }
                        SetupField::HouseNumber => {
                            app.house_number_input.push(character);
                        }
                        SetupField::Resources => {}
                    }
                }
            }
            Backspace => {
                match app.focus {
                    SetupField::Postcode => {
                        app.postcode_input.pop();
                    }
                    SetupField::HouseNumber => {
                        app.house_number_input.pop();
                    }
                    SetupField::Resources => {}
                }
            }
            Enter => {
                action = Action::ApplySetup;
            }
            _ => {}
        },

        Screen::Schedule => match key.code {
            Char('r') => {
                action = Action::RefreshSchedule;
            }
            Left | Esc | Char('b') => {
                app.screen = Screen::Setup;
                app.error_message = None;
            }
            _ => {}
        },
    }
    action
}
