//! Routine execution
//!
//! Owns the gantry and the color sensor and runs [`Plan`]s step by step.
//! `Await` moves suspend the caller until the axis arrives; `Detach` moves
//! return as soon as they are issued.

use super::plan::{CalibrationConfig, Plan, PlanError, RoutinePlanner, Step};
use super::position::{Layout, Position};
use crate::axis::{Axes, Axis, JogDirection};
use crate::color::{ColorLabel, Palette};
use crate::inventory::Inventory;
use crate::traits::{Actuator, Button, ButtonSet, ColorSensor, Completion, Rgb, SensorError};

/// Result of a store request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreOutcome {
    /// Brick carried into its bin
    Stored,
    /// Bin already full, nothing moved
    AlreadyStored,
}

/// Result of a retrieve request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RetrieveOutcome {
    /// Brick carried to the drop-off point
    Retrieved,
    /// Bin empty, nothing moved
    Empty,
}

/// Runs routines and jog ticks on the gantry
pub struct MotionSequencer<A, S> {
    axes: Axes<A>,
    sensor: S,
    palette: Palette,
    layout: Layout,
    calibration: CalibrationConfig,
}

impl<A: Actuator, S: ColorSensor> MotionSequencer<A, S> {
    pub fn new(
        axes: Axes<A>,
        sensor: S,
        palette: Palette,
        layout: Layout,
        calibration: CalibrationConfig,
    ) -> Self {
        Self {
            axes,
            sensor,
            palette,
            layout,
            calibration,
        }
    }

    pub fn axes(&self) -> &Axes<A> {
        &self.axes
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    fn planner(&self) -> RoutinePlanner<'_> {
        RoutinePlanner::new(&self.layout, &self.calibration)
    }

    /// Run every step of a plan in order
    pub async fn execute(&mut self, plan: &Plan) {
        for step in plan.steps() {
            match *step {
                Step::Move(m) => {
                    let axis = self.axes.get_mut(m.axis);
                    match m.speed {
                        Some(speed) => axis.move_to_at(speed, m.target, m.completion).await,
                        None => axis.move_to(m.target, m.completion).await,
                    };
                }
                Step::SeekStop {
                    axis,
                    direction,
                    torque_pct,
                } => {
                    self.axes
                        .get_mut(axis)
                        .run_until_stalled(direction, torque_pct)
                        .await;
                }
                Step::Rezero { axis, angle } => {
                    self.axes.get_mut(axis).reset_reference(angle).await;
                }
            }
        }
    }

    /// Home all axes against their hard stops
    pub async fn calibrate(&mut self) -> Result<(), PlanError> {
        let plan = self.planner().calibrate()?;
        self.execute(&plan).await;
        Ok(())
    }

    /// Carry the brick at the pick-up point into `label`'s bin
    ///
    /// Refuses without any motion when the bin is already full.
    pub async fn store(
        &mut self,
        label: ColorLabel,
        inventory: &mut Inventory,
    ) -> Result<StoreOutcome, PlanError> {
        if inventory.is_occupied(label) {
            return Ok(StoreOutcome::AlreadyStored);
        }

        let plan = self.planner().store(label)?;
        self.execute(&plan).await;
        inventory.mark_occupied(label);
        Ok(StoreOutcome::Stored)
    }

    /// Bring `label`'s brick to the drop-off point
    ///
    /// Does nothing when the bin is empty.
    pub async fn retrieve(
        &mut self,
        label: ColorLabel,
        inventory: &mut Inventory,
    ) -> Result<RetrieveOutcome, PlanError> {
        if !inventory.is_occupied(label) {
            return Ok(RetrieveOutcome::Empty);
        }

        let plan = self.planner().retrieve(label)?;
        self.execute(&plan).await;
        inventory.mark_empty(label);
        Ok(RetrieveOutcome::Retrieved)
    }

    /// Move X then Y to a position, awaiting both
    pub async fn move_to_position(&mut self, position: Position) {
        self.axes.x.move_to(position.x, Completion::Await).await;
        self.axes.y.move_to(position.y, Completion::Await).await;
    }

    /// One manual jog tick
    ///
    /// In Z-axis mode the UP/DOWN pair drives Z (DOWN lowers toward max);
    /// otherwise it drives Y. LEFT/RIGHT always drive X.
    pub async fn jog_tick(&mut self, buttons: ButtonSet, vertical: bool) {
        if vertical {
            let direction = JogDirection::from_buttons(buttons, Button::Down, Button::Up);
            self.axes.z.jog(direction).await;
        } else {
            let direction = JogDirection::from_buttons(buttons, Button::Up, Button::Down);
            self.axes.y.jog(direction).await;
        }

        let direction = JogDirection::from_buttons(buttons, Button::Right, Button::Left);
        self.axes.x.jog(direction).await;
    }

    /// Stop one axis
    pub async fn halt_axis(&mut self, axis: Axis) {
        self.axes.get_mut(axis).halt().await;
    }

    /// Stop every axis
    pub async fn halt(&mut self) {
        self.axes.halt_all().await;
    }

    /// Raw sensor reading
    pub async fn sample(&mut self) -> Result<Rgb, SensorError> {
        self.sensor.rgb().await
    }

    /// Read and classify the brick under the sensor
    pub async fn detect_color(&mut self) -> Result<Option<ColorLabel>, SensorError> {
        let sample = self.sensor.rgb().await?;
        Ok(self.palette.classify(sample))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::AxisConfig;
    use crate::mock::{Call, CallLog, MockActuator, MockSensor};
    use crate::traits::StopMode;
    use embassy_futures::block_on;

    fn sequencer(log: &CallLog) -> MotionSequencer<MockActuator<'_>, MockSensor> {
        let bounded = |max: i32| AxisConfig {
            max_angle: max,
            ..AxisConfig::default()
        };
        let axes = Axes::new(
            (MockActuator::new(Axis::X, log), bounded(785)),
            (MockActuator::new(Axis::Y, log), bounded(1000)),
            (MockActuator::new(Axis::Z, log), bounded(400)),
        );
        MotionSequencer::new(
            axes,
            MockSensor::new(Rgb::new(0, 0, 0)),
            Palette::default(),
            Layout::default(),
            CalibrationConfig::default(),
        )
    }

    #[test]
    fn test_store_occupied_makes_no_calls() {
        let log = CallLog::default();
        let mut seq = sequencer(&log);
        let mut inventory = Inventory::new();
        inventory.mark_occupied(ColorLabel::Red);
        let before = inventory.clone();

        let outcome = block_on(seq.store(ColorLabel::Red, &mut inventory)).unwrap();
        assert_eq!(outcome, StoreOutcome::AlreadyStored);
        assert_eq!(log.len(), 0);
        assert_eq!(inventory, before);
    }

    #[test]
    fn test_retrieve_empty_makes_no_calls() {
        let log = CallLog::default();
        let mut seq = sequencer(&log);
        let mut inventory = Inventory::new();

        let outcome = block_on(seq.retrieve(ColorLabel::Blue, &mut inventory)).unwrap();
        assert_eq!(outcome, RetrieveOutcome::Empty);
        assert_eq!(log.len(), 0);
        assert_eq!(inventory.occupied_count(), 0);
    }

    #[test]
    fn test_store_then_retrieve_restores_inventory() {
        let log = CallLog::default();
        let mut seq = sequencer(&log);
        let mut inventory = Inventory::new();

        for label in ColorLabel::ALL {
            let before = inventory.clone();
            assert_eq!(
                block_on(seq.store(label, &mut inventory)).unwrap(),
                StoreOutcome::Stored
            );
            assert!(inventory.is_occupied(label));
            assert_eq!(
                block_on(seq.retrieve(label, &mut inventory)).unwrap(),
                RetrieveOutcome::Retrieved
            );
            assert_eq!(inventory, before);
        }
    }

    #[test]
    fn test_store_visits_bin_and_ends_at_standby() {
        let log = CallLog::default();
        let mut seq = sequencer(&log);
        let mut inventory = Inventory::new();

        block_on(seq.store(ColorLabel::LightGreen, &mut inventory)).unwrap();
        let targets = log.targets();
        assert!(targets.contains(&(Axis::X, 600, Completion::Await)));
        assert!(targets.contains(&(Axis::Y, 910, Completion::Await)));
        assert_eq!(targets.last(), Some(&(Axis::Y, 0, Completion::Await)));
        assert_eq!(seq.axes().x.angle(), 0);
        assert_eq!(seq.axes().z.angle(), 0);
    }

    #[test]
    fn test_vertical_jog_down_at_one_runs_positive() {
        let log = CallLog::default();
        let mut seq = sequencer(&log);
        seq.axes().z.actuator().set_angle(1);

        block_on(seq.jog_tick(ButtonSet::of(&[Button::Down]), true));
        assert_eq!(log.last(Axis::Z), Some(Call::Run(200)));
        assert_eq!(log.last(Axis::Y), None);
        assert_eq!(log.last(Axis::X), Some(Call::Stop));
    }

    #[test]
    fn test_vertical_jog_up_near_max_runs_negative() {
        let log = CallLog::default();
        let mut seq = sequencer(&log);
        seq.axes().z.actuator().set_angle(399);

        block_on(seq.jog_tick(ButtonSet::of(&[Button::Up]), true));
        assert_eq!(log.last(Axis::Z), Some(Call::Run(-200)));
    }

    #[test]
    fn test_planar_jog_drives_y_and_x() {
        let log = CallLog::default();
        let mut seq = sequencer(&log);
        seq.axes().y.actuator().set_angle(500);
        seq.axes().x.actuator().set_angle(500);

        block_on(seq.jog_tick(ButtonSet::of(&[Button::Up, Button::Left]), false));
        assert_eq!(log.last(Axis::Y), Some(Call::Run(200)));
        assert_eq!(log.last(Axis::X), Some(Call::Run(-200)));
        assert_eq!(log.last(Axis::Z), None);
    }

    #[test]
    fn test_move_to_position_awaits_both_axes() {
        let log = CallLog::default();
        let mut seq = sequencer(&log);

        block_on(seq.move_to_position(Position::new(100, 200)));
        assert_eq!(
            log.all(),
            std::vec![
                (
                    Axis::X,
                    Call::RunTarget {
                        speed: 550,
                        target: 100,
                        then: StopMode::Hold,
                        completion: Completion::Await
                    }
                ),
                (
                    Axis::Y,
                    Call::RunTarget {
                        speed: 550,
                        target: 200,
                        then: StopMode::Hold,
                        completion: Completion::Await
                    }
                ),
            ]
        );
    }

    #[test]
    fn test_calibrate_drives_each_axis_into_its_stop() {
        let log = CallLog::default();
        let mut seq = sequencer(&log);

        block_on(seq.calibrate()).unwrap();
        let calls = log.all();
        let stalls: std::vec::Vec<Axis> = calls
            .iter()
            .filter(|(_, c)| matches!(c, Call::RunUntilStalled { .. }))
            .map(|(a, _)| *a)
            .collect();
        assert_eq!(stalls, std::vec![Axis::Z, Axis::X, Axis::Y]);

        assert_eq!(
            calls[0],
            (
                Axis::Z,
                Call::RunUntilStalled {
                    speed: -550,
                    then: StopMode::Hold,
                    torque_pct: 40
                }
            )
        );
        assert_eq!(calls[1], (Axis::Z, Call::ResetAngle(0)));

        for axis in Axis::ALL {
            assert_eq!(seq.axes().get(axis).angle(), 0);
        }
    }

    #[test]
    fn test_detect_color_classifies_sample() {
        let log = CallLog::default();
        let mut seq = sequencer(&log);

        assert_eq!(block_on(seq.detect_color()).unwrap(), None);
        seq.sensor.queue(Rgb::new(0, 2, 24));
        assert_eq!(block_on(seq.detect_color()).unwrap(), Some(ColorLabel::Blue));
        assert_eq!(seq.sensor.reads, 2);
    }
}
