//! Mode controller
//!
//! Owns every device handle plus the inventory, and decides what each tick
//! does. Priority order within a tick:
//!
//! 1. LEFT+RIGHT runs a full calibration and nothing else.
//! 2. A touch press advances Manual -> AutoStore -> AutoRetrieve -> Manual.
//! 3. The active mode runs: jog, auto-store, or the retrieval menu.
//!
//! Inputs arriving while a routine runs are not seen; the routine finishes
//! before the next tick reads the pad again.

use heapless::Vec;

use super::menu::RetrievalMenu;
use super::screen::{self, centered, show_lines, show_notice, DETAIL_WIDTH, HEADLINE_WIDTH};
use super::timer::ElapsedTimer;
use super::ControlError;
use crate::axis::Axis;
use crate::config::TimingConfig;
use crate::inventory::Inventory;
use crate::motion::{MotionSequencer, StoreOutcome};
use crate::state::{ButtonEdge, Event, OperatingMode};
use crate::traits::{
    Actuator, Button, ButtonSet, Clock, ColorSensor, Display, LightColor, StatusLight,
};

/// Maximum events one tick can report
pub const MAX_TICK_EVENTS: usize = 4;

/// Events reported by one tick
pub type TickEvents = Vec<Event, MAX_TICK_EVENTS>;

const MANUAL_BANNER: &str = "Mode: Manual control";

/// Inputs sampled once at the start of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputSnapshot {
    /// Pad buttons held down
    pub buttons: ButtonSet,
    /// Mode-switch touch sensor level
    pub touch: bool,
}

/// Top-level control state
pub struct ModeController<A, S, D, L, C> {
    sequencer: MotionSequencer<A, S>,
    display: D,
    light: L,
    clock: C,
    timing: TimingConfig,
    inventory: Inventory,
    mode: OperatingMode,
    vertical: bool,
    touch: ButtonEdge,
    center: ButtonEdge,
    menu: RetrievalMenu,
    timer: ElapsedTimer,
}

impl<A, S, D, L, C> ModeController<A, S, D, L, C>
where
    A: Actuator,
    S: ColorSensor,
    D: Display,
    L: StatusLight,
    C: Clock,
{
    pub fn new(
        sequencer: MotionSequencer<A, S>,
        display: D,
        light: L,
        clock: C,
        timing: TimingConfig,
    ) -> Self {
        let timer = ElapsedTimer::new(clock.now_ms());
        Self {
            sequencer,
            display,
            light,
            clock,
            timing,
            inventory: Inventory::new(),
            mode: OperatingMode::Manual,
            vertical: false,
            touch: ButtonEdge::default(),
            center: ButtonEdge::default(),
            menu: RetrievalMenu::new(),
            timer,
        }
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Check if UP/DOWN currently jog Z instead of Y
    pub fn is_vertical(&self) -> bool {
        self.vertical
    }

    pub fn sequencer(&self) -> &MotionSequencer<A, S> {
        &self.sequencer
    }

    pub fn sequencer_mut(&mut self) -> &mut MotionSequencer<A, S> {
        &mut self.sequencer
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn light(&self) -> &L {
        &self.light
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Home the gantry before the first tick
    pub async fn start(&mut self) -> Result<TickEvents, ControlError> {
        let mut events = TickEvents::new();
        self.calibrate(&mut events).await?;
        Ok(events)
    }

    /// Run one control tick
    pub async fn tick(&mut self, input: InputSnapshot) -> Result<TickEvents, ControlError> {
        let mut events = TickEvents::new();
        let buttons = input.buttons;

        if buttons.contains(Button::Left)
            && buttons.contains(Button::Right)
            && self.mode != OperatingMode::Calibrate
        {
            self.calibrate(&mut events).await?;
            return Ok(events);
        }

        if self.touch.update(input.touch) {
            let previous = self.mode;
            self.apply(Event::ModeAdvance, &mut events);
            self.enter(previous).await?;
        }

        match self.mode {
            OperatingMode::Manual => self.manual(buttons, &mut events).await?,
            OperatingMode::AutoStore => self.auto_store(&mut events).await?,
            OperatingMode::AutoRetrieve => {
                let event = self
                    .menu
                    .tick(buttons, &mut self.sequencer, &mut self.inventory, &mut self.display)
                    .await?;
                if let Some(event) = event {
                    let _ = events.push(event);
                }
            }
            OperatingMode::Calibrate => {}
        }

        Ok(events)
    }

    fn apply(&mut self, event: Event, events: &mut TickEvents) {
        self.mode = self.mode.transition(event);
        let _ = events.push(event);
    }

    async fn calibrate(&mut self, events: &mut TickEvents) -> Result<(), ControlError> {
        self.apply(Event::CalibrationRequested, events);
        self.light.set(LightColor::Red);
        let notice = show_lines(&mut self.display, &["Calibration active.", "Please wait."]).await;

        let homed = self.sequencer.calibrate().await;

        // Calibrate never outlives the tick that entered it
        self.apply(Event::CalibrationComplete, events);
        self.menu.invalidate();
        self.light.set(LightColor::Green);
        let banner = show_lines(&mut self.display, &[MANUAL_BANNER]).await;

        homed?;
        notice?;
        banner?;
        Ok(())
    }

    /// Entry actions after a touch press moved the mode on from `previous`
    async fn enter(&mut self, previous: OperatingMode) -> Result<(), ControlError> {
        if previous == OperatingMode::Manual {
            self.sequencer.halt().await;
        }

        match self.mode {
            OperatingMode::AutoStore => {
                self.light.set(LightColor::Orange);
                self.display.clear().await?;
                self.clock.delay_ms(self.timing.mode_debounce_ms).await;
            }
            OperatingMode::AutoRetrieve => {
                self.light.set(LightColor::Yellow);
                self.display.clear().await?;
            }
            OperatingMode::Manual => {
                self.menu.invalidate();
                self.light.set(LightColor::Green);
                show_lines(&mut self.display, &[MANUAL_BANNER]).await?;
            }
            OperatingMode::Calibrate => {}
        }
        Ok(())
    }

    async fn manual(&mut self, buttons: ButtonSet, events: &mut TickEvents) -> Result<(), ControlError> {
        let now = self.clock.now_ms();
        let refreshed = if self.timer.exceeded(now, self.timing.status_refresh_ms) {
            self.timer.reset(now);
            self.refresh_status().await
        } else {
            Ok(())
        };

        if self.center.update(buttons.contains(Button::Center)) {
            self.vertical = !self.vertical;
            // The channel that just lost its keys must not keep running
            let idle = if self.vertical { Axis::Y } else { Axis::Z };
            self.sequencer.halt_axis(idle).await;
            let _ = events.push(Event::VerticalJog(self.vertical));
        }

        // Jogging runs every tick so a moving axis always sees its bound
        self.sequencer.jog_tick(buttons, self.vertical).await;
        refreshed
    }

    /// Redraw the manual-mode status screen
    async fn refresh_status(&mut self) -> Result<(), ControlError> {
        let sample = self.sequencer.sample().await?;
        let axes = self.sequencer.axes();
        let angles = [axes.x.angle(), axes.y.angle(), axes.z.angle()];
        let lines = screen::status_lines(self.vertical, angles, sample);

        self.display.clear().await?;
        for line in &lines {
            self.display.print(line).await?;
        }
        Ok(())
    }

    async fn auto_store(&mut self, events: &mut TickEvents) -> Result<(), ControlError> {
        let notice_due = self
            .timer
            .exceeded(self.clock.now_ms(), self.timing.notice_interval_ms);

        let label = match self.sequencer.detect_color().await? {
            Some(label) if self.inventory.is_occupied(label) => {
                if notice_due {
                    show_notice(
                        &mut self.display,
                        &centered("Color is already", HEADLINE_WIDTH),
                        &centered("in storage", DETAIL_WIDTH),
                    )
                    .await?;
                    self.timer.reset(self.clock.now_ms());
                    let _ = events.push(Event::AlreadyStored(label));
                }
                return Ok(());
            }
            Some(_) => {
                // Let the brick settle, then trust the second reading
                self.clock.delay_ms(self.timing.confirm_delay_ms).await;
                match self.sequencer.detect_color().await? {
                    Some(label) => label,
                    None => {
                        self.timer.reset(self.clock.now_ms());
                        return Ok(());
                    }
                }
            }
            None => {
                if notice_due {
                    show_notice(
                        &mut self.display,
                        &centered("No color", DETAIL_WIDTH),
                        &centered("detected", DETAIL_WIDTH),
                    )
                    .await?;
                    self.timer.reset(self.clock.now_ms());
                }
                return Ok(());
            }
        };

        show_notice(
            &mut self.display,
            &centered("Detected color:", HEADLINE_WIDTH),
            &centered(label.name(), DETAIL_WIDTH),
        )
        .await?;
        self.timer.reset(self.clock.now_ms());

        match self.sequencer.store(label, &mut self.inventory).await? {
            StoreOutcome::Stored => {
                self.display.clear().await?;
                let _ = events.push(Event::Stored(label));
            }
            StoreOutcome::AlreadyStored => {
                let _ = events.push(Event::AlreadyStored(label));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::{Axes, AxisConfig};
    use crate::color::{ColorLabel, Palette};
    use crate::mock::{Call, CallLog, MockActuator, MockClock, MockDisplay, MockLight, MockSensor};
    use crate::motion::{CalibrationConfig, Layout};
    use crate::traits::{DisplayError, Rgb, SensorError};
    use embassy_futures::block_on;

    type TestController<'a> =
        ModeController<MockActuator<'a>, MockSensor, MockDisplay, MockLight, MockClock>;

    const DARK: Rgb = Rgb::new(0, 0, 0);
    const RED: Rgb = Rgb::new(8, 0, 0);

    fn controller(log: &CallLog) -> TestController<'_> {
        controller_with(log, MockDisplay::default())
    }

    fn controller_with(log: &CallLog, display: MockDisplay) -> TestController<'_> {
        let bounded = |max: i32| AxisConfig {
            max_angle: max,
            ..AxisConfig::default()
        };
        let axes = Axes::new(
            (MockActuator::new(Axis::X, log), bounded(785)),
            (MockActuator::new(Axis::Y, log), bounded(1000)),
            (MockActuator::new(Axis::Z, log), bounded(400)),
        );
        let sequencer = MotionSequencer::new(
            axes,
            MockSensor::new(DARK),
            Palette::default(),
            Layout::default(),
            CalibrationConfig::default(),
        );
        ModeController::new(
            sequencer,
            display,
            MockLight::default(),
            MockClock::default(),
            TimingConfig::default(),
        )
    }

    fn input(buttons: &[Button], touch: bool) -> InputSnapshot {
        InputSnapshot {
            buttons: ButtonSet::of(buttons),
            touch,
        }
    }

    fn idle() -> InputSnapshot {
        InputSnapshot::default()
    }

    /// Press and release the touch sensor `n` times
    fn advance_mode(c: &mut TestController<'_>, n: usize) {
        for _ in 0..n {
            block_on(c.tick(input(&[], true))).unwrap();
            block_on(c.tick(idle())).unwrap();
        }
    }

    #[test]
    fn test_start_calibrates_into_manual() {
        let log = CallLog::default();
        let mut c = controller(&log);

        let events = block_on(c.start()).unwrap();
        assert_eq!(
            events.as_slice(),
            &[Event::CalibrationRequested, Event::CalibrationComplete]
        );
        assert_eq!(c.mode(), OperatingMode::Manual);
        assert_eq!(c.light().history, std::vec![LightColor::Red, LightColor::Green]);
        assert!(c.display().shows(MANUAL_BANNER));
        assert!(log
            .all()
            .iter()
            .any(|(_, call)| matches!(call, Call::RunUntilStalled { .. })));
    }

    #[test]
    fn test_left_right_runs_calibration_only() {
        let log = CallLog::default();
        let mut c = controller(&log);
        advance_mode(&mut c, 1);
        assert_eq!(c.mode(), OperatingMode::AutoStore);
        log.clear();

        let events = block_on(c.tick(input(&[Button::Left, Button::Right], true))).unwrap();
        assert_eq!(
            events.as_slice(),
            &[Event::CalibrationRequested, Event::CalibrationComplete]
        );
        // The touch press in the same tick was not handled
        assert_eq!(c.mode(), OperatingMode::Manual);
        let stalls: std::vec::Vec<Axis> = log
            .all()
            .iter()
            .filter(|(_, call)| matches!(call, Call::RunUntilStalled { .. }))
            .map(|(axis, _)| *axis)
            .collect();
        assert_eq!(stalls, std::vec![Axis::Z, Axis::X, Axis::Y]);
        assert!(!log.all().iter().any(|(_, call)| matches!(call, Call::Run(_))));
    }

    #[test]
    fn test_three_touches_return_to_manual() {
        let log = CallLog::default();
        let mut c = controller(&log);

        advance_mode(&mut c, 1);
        assert_eq!(c.mode(), OperatingMode::AutoStore);
        assert_eq!(c.light().history.last(), Some(&LightColor::Orange));

        advance_mode(&mut c, 1);
        assert_eq!(c.mode(), OperatingMode::AutoRetrieve);
        assert_eq!(c.light().history.last(), Some(&LightColor::Yellow));

        advance_mode(&mut c, 1);
        assert_eq!(c.mode(), OperatingMode::Manual);
        assert_eq!(c.light().history.last(), Some(&LightColor::Green));
        assert!(c.display().shows(MANUAL_BANNER));
    }

    #[test]
    fn test_held_touch_advances_once() {
        let log = CallLog::default();
        let mut c = controller(&log);
        for _ in 0..5 {
            block_on(c.tick(input(&[], true))).unwrap();
        }
        assert_eq!(c.mode(), OperatingMode::AutoStore);
    }

    #[test]
    fn test_entering_auto_store_halts_and_pauses() {
        let log = CallLog::default();
        let mut c = controller(&log);

        let events = block_on(c.tick(input(&[], true))).unwrap();
        assert_eq!(events.first(), Some(&Event::ModeAdvance));
        for axis in Axis::ALL {
            assert!(log
                .all()
                .iter()
                .any(|(a, call)| *a == axis && *call == Call::Stop));
        }
        assert_eq!(c.clock_mut().delays.first(), Some(&100));
    }

    #[test]
    fn test_vertical_jog_down_runs_positive() {
        let log = CallLog::default();
        let mut c = controller(&log);

        let events = block_on(c.tick(input(&[Button::Center], false))).unwrap();
        assert_eq!(events.as_slice(), &[Event::VerticalJog(true)]);
        assert!(c.is_vertical());
        // Switching channels halts the forward axis once
        assert_eq!(log.last(Axis::Y), Some(Call::Stop));

        c.sequencer().axes().z.actuator().set_angle(1);
        block_on(c.tick(input(&[Button::Down], false))).unwrap();
        assert_eq!(log.last(Axis::Z), Some(Call::Run(200)));

        c.sequencer().axes().z.actuator().set_angle(399);
        block_on(c.tick(input(&[Button::Up], false))).unwrap();
        assert_eq!(log.last(Axis::Z), Some(Call::Run(-200)));
    }

    #[test]
    fn test_center_held_toggles_once() {
        let log = CallLog::default();
        let mut c = controller(&log);
        for _ in 0..3 {
            block_on(c.tick(input(&[Button::Center], false))).unwrap();
        }
        assert!(c.is_vertical());
        block_on(c.tick(idle())).unwrap();
        block_on(c.tick(input(&[Button::Center], false))).unwrap();
        assert!(!c.is_vertical());
        assert_eq!(log.last(Axis::Z), Some(Call::Stop));
    }

    #[test]
    fn test_status_refresh_after_period() {
        let log = CallLog::default();
        let mut c = controller(&log);

        c.clock_mut().now = 1000;
        block_on(c.tick(idle())).unwrap();
        assert!(!c.display().shows("X-axis"));

        c.clock_mut().now = 1001;
        block_on(c.tick(idle())).unwrap();
        assert!(c.display().shows("Z-axis mode: false"));
        assert!(c.display().shows("Colors: (0, 0, 0)"));
        assert_eq!(c.display().lines.len(), 6);
    }

    #[test]
    fn test_auto_store_stores_confirmed_color() {
        let log = CallLog::default();
        let mut c = controller(&log);
        advance_mode(&mut c, 1);
        log.clear();

        c.sequencer_mut().sensor_mut().set_fallback(RED);
        let events = block_on(c.tick(idle())).unwrap();
        assert_eq!(events.as_slice(), &[Event::Stored(ColorLabel::Red)]);
        assert!(c.inventory().is_occupied(ColorLabel::Red));
        assert!(c.clock_mut().delays.contains(&250));
        assert!(!log.targets().is_empty());
        // Display cleared once the routine finished
        assert!(c.display().lines.is_empty());
    }

    #[test]
    fn test_auto_store_refuses_occupied_color() {
        let log = CallLog::default();
        let mut c = controller(&log);
        advance_mode(&mut c, 1);
        c.sequencer_mut().sensor_mut().set_fallback(RED);
        block_on(c.tick(idle())).unwrap();
        log.clear();

        c.clock_mut().now += 501;
        let events = block_on(c.tick(idle())).unwrap();
        assert_eq!(events.as_slice(), &[Event::AlreadyStored(ColorLabel::Red)]);
        assert_eq!(log.len(), 0);
        assert!(c.display().shows("Color is already"));
        assert!(c.display().shows("in storage"));

        // Notice is rate limited
        let events = block_on(c.tick(idle())).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_auto_store_unknown_resample_aborts() {
        let log = CallLog::default();
        let mut c = controller(&log);
        advance_mode(&mut c, 1);
        log.clear();

        c.sequencer_mut().sensor_mut().queue(RED);
        let events = block_on(c.tick(idle())).unwrap();
        assert!(events.is_empty());
        assert_eq!(log.len(), 0);
        assert_eq!(c.inventory().occupied_count(), 0);
    }

    #[test]
    fn test_auto_store_names_resampled_color_before_storing() {
        let log = CallLog::default();
        let mut c = controller(&log);
        advance_mode(&mut c, 1);
        c.sequencer_mut().sensor_mut().set_fallback(RED);
        block_on(c.tick(idle())).unwrap();
        log.clear();

        // First reading is blue, the settled reading is the stored red
        c.clock_mut().now += 100;
        c.sequencer_mut().sensor_mut().queue(Rgb::new(0, 2, 24));
        let events = block_on(c.tick(idle())).unwrap();
        assert_eq!(events.as_slice(), &[Event::AlreadyStored(ColorLabel::Red)]);
        assert_eq!(log.len(), 0);
        assert!(c.display().shows("Detected color:"));
        assert!(c.display().shows("red"));

        // Timer restarted after the notice, so the next full-bin notice waits
        c.clock_mut().now += 400;
        let events = block_on(c.tick(idle())).unwrap();
        assert!(events.is_empty());
        c.clock_mut().now += 101;
        let events = block_on(c.tick(idle())).unwrap();
        assert_eq!(events.as_slice(), &[Event::AlreadyStored(ColorLabel::Red)]);
    }

    #[test]
    fn test_auto_store_no_color_notice() {
        let log = CallLog::default();
        let mut c = controller(&log);
        advance_mode(&mut c, 1);

        c.clock_mut().now += 501;
        block_on(c.tick(idle())).unwrap();
        assert!(c.display().shows("No color"));
        assert!(c.display().shows("detected"));
        assert_eq!(log.targets().len(), 0);
    }

    #[test]
    fn test_retrieve_from_menu_after_store() {
        let log = CallLog::default();
        let mut c = controller(&log);
        advance_mode(&mut c, 1);
        c.sequencer_mut().sensor_mut().set_fallback(RED);
        block_on(c.tick(idle())).unwrap();
        c.sequencer_mut().sensor_mut().set_fallback(DARK);

        advance_mode(&mut c, 1);
        assert_eq!(c.mode(), OperatingMode::AutoRetrieve);
        assert_eq!(c.display().images.last(), Some(&ColorLabel::Red));

        let events = block_on(c.tick(input(&[Button::Center], false))).unwrap();
        assert_eq!(events.as_slice(), &[Event::Retrieved(ColorLabel::Red)]);
        assert_eq!(c.inventory().occupied_count(), 0);
    }

    #[test]
    fn test_manual_reentry_redraws_menu() {
        let log = CallLog::default();
        let mut c = controller(&log);
        advance_mode(&mut c, 2);
        let drawn = c.display().images.len();
        assert_eq!(drawn, 1);

        advance_mode(&mut c, 3);
        assert_eq!(c.mode(), OperatingMode::AutoRetrieve);
        assert_eq!(c.display().images.len(), 2);
    }

    #[test]
    fn test_calibration_finishes_when_display_is_down() {
        let log = CallLog::default();
        let mut c = controller_with(&log, MockDisplay::failing());

        assert_eq!(
            block_on(c.start()),
            Err(ControlError::Display(DisplayError::Bus))
        );
        assert_eq!(c.mode(), OperatingMode::Manual);
        assert_eq!(c.light().history, std::vec![LightColor::Red, LightColor::Green]);
        let stalls = log
            .all()
            .iter()
            .filter(|(_, call)| matches!(call, Call::RunUntilStalled { .. }))
            .count();
        assert_eq!(stalls, 3);

        // Manual control still answers
        block_on(c.tick(input(&[Button::Right], false))).unwrap();
        assert_eq!(log.last(Axis::X), Some(Call::Run(200)));

        // And calibration can be requested again
        let result = block_on(c.tick(input(&[Button::Left, Button::Right], false)));
        assert!(result.is_err());
        assert_eq!(c.mode(), OperatingMode::Manual);
    }

    #[test]
    fn test_failed_status_sample_still_stops_jog_at_bound() {
        let log = CallLog::default();
        let mut c = controller(&log);
        block_on(c.tick(input(&[Button::Center], false))).unwrap();
        c.sequencer().axes().z.actuator().set_angle(1);
        block_on(c.tick(input(&[Button::Down], false))).unwrap();
        assert_eq!(log.last(Axis::Z), Some(Call::Run(200)));

        c.sequencer_mut().sensor_mut().fail = true;
        c.sequencer().axes().z.actuator().set_angle(400);
        c.clock_mut().now = 1001;
        assert_eq!(
            block_on(c.tick(input(&[Button::Down], false))),
            Err(ControlError::Sensor(SensorError::Bus))
        );
        assert_eq!(log.last(Axis::Z), Some(Call::Stop));

        // The refresh period restarted, so the next tick is clean
        assert!(block_on(c.tick(input(&[Button::Down], false))).is_ok());
    }

    #[test]
    fn test_failed_status_redraw_still_jogs() {
        let log = CallLog::default();
        let mut c = controller_with(&log, MockDisplay::failing());

        c.clock_mut().now = 1001;
        let result = block_on(c.tick(input(&[Button::Right], false)));
        assert_eq!(result, Err(ControlError::Display(DisplayError::Bus)));
        assert_eq!(log.last(Axis::X), Some(Call::Run(200)));
    }

    #[test]
    fn test_touch_cycle_survives_dead_display() {
        let log = CallLog::default();
        let mut c = controller_with(&log, MockDisplay::failing());

        let expected = [
            OperatingMode::AutoStore,
            OperatingMode::AutoRetrieve,
            OperatingMode::Manual,
        ];
        for mode in expected {
            assert!(block_on(c.tick(input(&[], true))).is_err());
            assert_eq!(c.mode(), mode);
            let _ = block_on(c.tick(idle()));
        }
    }
}
