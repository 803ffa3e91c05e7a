pub mod command;
pub mod none;

use anyhow::bail;
use anyhow::Result;

use crate::domain::models::RecognizerBox;
use crate::domain::models::RecognizerName;

pub struct RecognizerManager {}

impl RecognizerManager {
    pub fn get(name: RecognizerName) -> Result<RecognizerBox> {
        if name == RecognizerName::Command {
            return Ok(Box::<command::CommandRecognizer>::default());
        }

        if name == RecognizerName::None {
            return Ok(Box::<none::NoRecognizer>::default());
        }

        bail!(format!("No recognizer implemented for {name}"))
    }
}
