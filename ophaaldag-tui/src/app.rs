use std::sync::Arc;

use ophaaldag_core::{
    config::PlatformConfig,
    ports::WastePort,
    reader::WasteApiReader,
    sensor::WasteSensor,
};

/// Resource keys offered on the setup screen, in display order.
const BUILTIN_RESOURCE_KEYS: [&str; 6] = ["today", "tomorrow", "grey", "green", "paper", "packages"];

#[derive(Debug, Clone, Copy)]
pub(crate) enum Screen {
    Setup,
    Schedule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SetupField {
    Postcode,
    HouseNumber,
    Resources,
}

pub(crate) struct App {
    pub port: Arc<dyn WastePort>,

    pub screen: Screen,

    pub postcode_input: String,
    pub house_number_input: String,
    pub focus: SetupField,
    pub resource_keys: Vec<String>,
    pub resource_selected: Vec<bool>,
    pub resource_index: usize,

    pub reader: Option<WasteApiReader>,
    pub sensors: Vec<WasteSensor>,

    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl App {
    pub(crate) fn new(port: Arc<dyn WastePort>, config: &PlatformConfig) -> Self {
        let mut resource_keys: Vec<String> = BUILTIN_RESOURCE_KEYS
            .iter()
            .map(|&key| key.to_owned())
            .collect();

        // Configured keys outside the built-in set stay selectable too.
        for key in &config.resources {
            let normalized = key.to_lowercase();
            if !resource_keys.contains(&normalized) {
                resource_keys.push(normalized);
            }
        }

        let resource_selected = resource_keys
            .iter()
            .map(|key| {
                config
                    .resources
                    .iter()
                    .any(|configured| configured.eq_ignore_ascii_case(key))
            })
            .collect();

        Self {
            port,
            screen: Screen::Setup,
            postcode_input: config.postcode.clone(),
            house_number_input: config.house_number.clone(),
            focus: SetupField::Postcode,
            resource_keys,
            resource_selected,
            resource_index: 0,
            reader: None,
            sensors: Vec::new(),
            is_loading: false,
            error_message: None,
        }
    }

    pub(crate) fn focus_next(&mut self) {
        self.focus = match self.focus {
            SetupField::Postcode => SetupField::HouseNumber,
            SetupField::HouseNumber => SetupField::Resources,
            SetupField::Resources => SetupField::Postcode,
        };
    }

    pub(crate) fn toggle_current_resource(&mut self) {
        if let Some(selected) = self.resource_selected.get_mut(self.resource_index) {
            *selected = !*selected;
        }
    }

    /// Assemble a platform configuration from the current form state.
    pub(crate) fn form_config(&self) -> PlatformConfig {
        let resources = self
            .resource_keys
            .iter()
            .zip(&self.resource_selected)
            .filter(|&(_, selected)| *selected)
            .map(|(key, _)| key.clone())
            .collect();

        PlatformConfig {
            resources,
            postcode: self.postcode_input.trim().to_owned(),
            house_number: self.house_number_input.trim().to_owned(),
        }
    }
}
