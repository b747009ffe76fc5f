//! Retrieval menu
//!
//! One page per color in palette order. UP/DOWN flip pages (wrapping) and
//! CENTER retrieves the color on the current page. A page is drawn as the
//! color's swatch image.

use super::ControlError;
use crate::color::{ColorLabel, COLOR_COUNT};
use crate::inventory::Inventory;
use crate::motion::{MotionSequencer, RetrieveOutcome};
use crate::state::{ButtonEdge, Event};
use crate::traits::{Actuator, Button, ButtonSet, ColorSensor, Display};

/// Page selection and redraw state of the retrieval menu
#[derive(Debug, Clone, Default)]
pub struct RetrievalMenu {
    page: usize,
    rendered: bool,
    up: ButtonEdge,
    down: ButtonEdge,
    center: ButtonEdge,
}

impl RetrievalMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color on the current page
    pub fn selected(&self) -> ColorLabel {
        ColorLabel::ALL[self.page]
    }

    /// Check if the current page is on screen
    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    /// Force a redraw on the next tick
    pub fn invalidate(&mut self) {
        self.rendered = false;
    }

    /// Handle one tick of button input
    ///
    /// Returns the outcome of a retrieve request if CENTER was pressed.
    pub async fn tick<A, S, D>(
        &mut self,
        buttons: ButtonSet,
        sequencer: &mut MotionSequencer<A, S>,
        inventory: &mut Inventory,
        display: &mut D,
    ) -> Result<Option<Event>, ControlError>
    where
        A: Actuator,
        S: ColorSensor,
        D: Display,
    {
        if self.up.update(buttons.only_one_of(Button::Up, Button::Down)) {
            self.page = (self.page + COLOR_COUNT - 1) % COLOR_COUNT;
            self.rendered = false;
            display.clear().await?;
        }

        if self.down.update(buttons.only_one_of(Button::Down, Button::Up)) {
            self.page = (self.page + 1) % COLOR_COUNT;
            self.rendered = false;
            display.clear().await?;
        }

        let mut event = None;
        if self.center.update(buttons.contains(Button::Center)) {
            let label = self.selected();
            event = Some(match sequencer.retrieve(label, inventory).await? {
                RetrieveOutcome::Retrieved => Event::Retrieved(label),
                RetrieveOutcome::Empty => Event::NothingToRetrieve(label),
            });
        }

        if !self.rendered {
            display.load_image(self.selected()).await?;
            self.rendered = true;
        }

        Ok(event)
    }
}
