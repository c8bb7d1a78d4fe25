use yansi::Paint;

use crate::models::InstanceState;

pub fn format_state(state: &InstanceState) -> String {
    match state {
        InstanceState::Running => Paint::new("running").green().to_string(),
        InstanceState::Pending => Paint::new("pending").cyan().to_string(),
        InstanceState::Stopping | InstanceState::ShuttingDown => {
            Paint::new(state.as_str()).yellow().to_string()
        }
        InstanceState::Stopped => Paint::new("stopped").yellow().dim().to_string(),
        InstanceState::Terminated => Paint::new("terminated").red().to_string(),
        InstanceState::Other(label) => label.to_string(),
    }
}
