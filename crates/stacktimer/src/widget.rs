use crate::press::HoldDetector;
use crate::ticker::{Scheduler, TickId, TickSlot};
use stacktimer_core::config::Config;
use stacktimer_core::limits::{adjust, BreakFlow, Direction, Limits};
use stacktimer_core::protocol::{Channel, Feedback, Gesture, ModeKind, Snapshot};
use stacktimer_core::task::{format_time, minutes_to_seconds, AccentColor, Task};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Whether a countdown is ticking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Run {
    Running,
    Paused,
}

#[derive(Debug, Clone, PartialEq)]
enum Mode {
    View,
    /// Editing a draft copy of the task.
    Edit(Task),
    Timer(Run),
    /// Offering a break of `minutes`. `resume` is the countdown that was
    /// cut short by finishing early; declining goes back to it.
    BreakPrompt { minutes: u32, resume: Option<Run> },
    Break(Run),
    /// Awaiting a sustained press. Cancelling returns to the draft, if any.
    Delete { draft: Option<Task> },
}

impl Mode {
    fn kind(&self) -> ModeKind {
        match self {
            Mode::View => ModeKind::View,
            Mode::Edit(_) => ModeKind::Edit,
            Mode::Timer(_) => ModeKind::Timer,
            Mode::BreakPrompt { .. } => ModeKind::BreakPrompt,
            Mode::Break(_) => ModeKind::Break,
            Mode::Delete { .. } => ModeKind::Delete,
        }
    }
}

/// What the widget wants the host to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Feedback(Feedback),
    /// A countdown reached zero.
    Completed(Channel),
}

/// The stack timer card: one task, its countdown and an optional break.
pub struct TimerWidget<S: Scheduler> {
    mode: Mode,
    task: Option<Task>,
    remaining_secs: u32,
    break_remaining_secs: u32,
    limits: Limits,
    default_task: Task,
    tick_interval: Duration,
    hold: HoldDetector,
    scheduler: S,
    tick: TickSlot<S::Handle>,
}

impl<S: Scheduler> TimerWidget<S> {
    pub fn new(config: &Config, scheduler: S) -> Self {
        let default_task = config.default_task();
        Self {
            mode: Mode::View,
            remaining_secs: default_task.duration_secs(),
            task: Some(default_task.clone()),
            break_remaining_secs: 0,
            limits: config.limits(),
            default_task,
            tick_interval: Duration::from_millis(config.general.tick_ms.max(1)),
            hold: HoldDetector::new(Duration::from_millis(config.general.hold_ms)),
            scheduler,
            tick: TickSlot::new(),
        }
    }

    // --- queries ---

    pub fn mode(&self) -> ModeKind {
        self.mode.kind()
    }

    pub fn task(&self) -> Option<&Task> {
        self.task.as_ref()
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn break_remaining_secs(&self) -> u32 {
        self.break_remaining_secs
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.mode, Mode::Timer(Run::Paused) | Mode::Break(Run::Paused))
    }

    /// The countdown channel currently ticking, if any.
    pub fn active_tick(&self) -> Option<Channel> {
        self.tick.active()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.mode.kind(),
            task: self.task.clone(),
            remaining_secs: self.remaining_secs,
            remaining: format_time(self.remaining_secs),
            paused: self.is_paused(),
            break_remaining_secs: self.break_remaining_secs,
            draft: match &self.mode {
                Mode::Edit(draft) => Some(draft.clone()),
                _ => None,
            },
            break_prompt_minutes: match self.mode {
                Mode::BreakPrompt { minutes, .. } => Some(minutes),
                _ => None,
            },
        }
    }

    // --- empty state ---

    /// Install the default task when there is none.
    pub fn add_task(&mut self) -> Vec<Action> {
        if self.task.is_some() || self.mode != Mode::View {
            return Vec::new();
        }
        info!(name = %self.default_task.name, "task added");
        self.task = Some(self.default_task.clone());
        self.reset_remaining();
        Vec::new()
    }

    // --- countdown ---

    pub fn start(&mut self) -> Vec<Action> {
        if self.mode != Mode::View || self.task.is_none() {
            debug!(mode = ?self.mode.kind(), "start ignored");
            return Vec::new();
        }
        if self.remaining_secs == 0 {
            self.reset_remaining();
        }
        info!(remaining = self.remaining_secs, "countdown started");
        self.mode = Mode::Timer(Run::Running);
        self.acquire(Channel::Task);
        vec![Action::Feedback(Feedback::Impact)]
    }

    pub fn pause(&mut self) -> Vec<Action> {
        match self.mode {
            Mode::Timer(Run::Running) => self.mode = Mode::Timer(Run::Paused),
            Mode::Break(Run::Running) => self.mode = Mode::Break(Run::Paused),
            _ => return Vec::new(),
        }
        self.release();
        debug!(remaining = self.remaining_secs, "paused");
        vec![Action::Feedback(Feedback::Selection)]
    }

    pub fn resume(&mut self) -> Vec<Action> {
        let channel = match self.mode {
            Mode::Timer(Run::Paused) => {
                self.mode = Mode::Timer(Run::Running);
                Channel::Task
            }
            Mode::Break(Run::Paused) => {
                self.mode = Mode::Break(Run::Running);
                Channel::Break
            }
            _ => return Vec::new(),
        };
        self.acquire(channel);
        debug!(?channel, "resumed");
        vec![Action::Feedback(Feedback::Selection)]
    }

    /// Stop the task countdown and go back to the card. Idempotent.
    pub fn cancel_timer(&mut self) -> Vec<Action> {
        if !matches!(self.mode, Mode::Timer(_)) {
            return Vec::new();
        }
        self.release();
        self.reset_remaining();
        self.mode = Mode::View;
        info!("countdown cancelled");
        Vec::new()
    }

    pub fn finish_early(&mut self) -> Vec<Action> {
        let Mode::Timer(run) = self.mode else {
            return Vec::new();
        };
        if self.task.is_none() {
            return Vec::new();
        }
        info!(remaining = self.remaining_secs, "finished early");
        self.release();
        let mut actions = vec![Action::Feedback(Feedback::Impact)];
        actions.extend(self.enter_break_flow(Some(run)));
        actions
    }

    /// Deliver one periodic tick. Ticks from released handles are dropped.
    pub fn tick(&mut self, id: TickId) -> Vec<Action> {
        let Some(channel) = self.tick.accepts(id) else {
            debug!(id, "stale tick ignored");
            return Vec::new();
        };

        let running = matches!(
            (channel, &self.mode),
            (Channel::Task, Mode::Timer(Run::Running)) | (Channel::Break, Mode::Break(Run::Running))
        );
        if !running {
            debug!(?channel, mode = ?self.mode.kind(), "tick outside its countdown");
            self.release();
            return Vec::new();
        }

        match channel {
            Channel::Task => self.tick_task(),
            Channel::Break => self.tick_break(),
        }
    }

    fn tick_task(&mut self) -> Vec<Action> {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return Vec::new();
        }
        info!("countdown complete");
        self.release();
        if self.limits.consume_on_finish {
            self.task = None;
        }
        let mut actions = vec![
            Action::Completed(Channel::Task),
            Action::Feedback(Feedback::Success),
        ];
        actions.extend(self.enter_break_flow(None));
        actions
    }

    fn tick_break(&mut self) -> Vec<Action> {
        self.break_remaining_secs = self.break_remaining_secs.saturating_sub(1);
        if self.break_remaining_secs > 0 {
            return Vec::new();
        }
        info!("break complete");
        self.release();
        self.mode = Mode::View;
        self.reset_remaining();
        vec![
            Action::Completed(Channel::Break),
            Action::Feedback(Feedback::Success),
        ]
    }

    // --- break ---

    fn enter_break_flow(&mut self, resume: Option<Run>) -> Vec<Action> {
        match self.limits.break_flow {
            BreakFlow::Countdown => self.start_break(self.limits.break_default),
            BreakFlow::Prompt => {
                self.mode = Mode::BreakPrompt {
                    minutes: self.limits.break_default,
                    resume,
                };
                Vec::new()
            }
        }
    }

    fn start_break(&mut self, minutes: u32) -> Vec<Action> {
        let minutes = self.limits.break_bounds.clamp(minutes);
        if self.limits.consume_on_finish {
            self.task = None;
        }
        self.break_remaining_secs = minutes_to_seconds(minutes);
        self.mode = Mode::Break(Run::Running);
        self.acquire(Channel::Break);
        info!(minutes, "break started");
        Vec::new()
    }

    pub fn adjust_break(&mut self, direction: Direction) -> Vec<Action> {
        let Mode::BreakPrompt { minutes, .. } = &mut self.mode else {
            return Vec::new();
        };
        *minutes = adjust(*minutes, direction, self.limits.break_step, self.limits.break_bounds);
        vec![Action::Feedback(Feedback::Selection)]
    }

    /// Take the offered break. Without `minutes`, the prompt's own value is used.
    pub fn confirm_break(&mut self, minutes: Option<u32>) -> Vec<Action> {
        let Mode::BreakPrompt { minutes: offered, .. } = self.mode else {
            return Vec::new();
        };
        let minutes = minutes.unwrap_or(offered);
        let mut actions = vec![Action::Feedback(Feedback::Success)];
        actions.extend(self.start_break(minutes));
        actions
    }

    /// Decline the offered break, or stop a running one. Declining after
    /// finishing early picks the countdown back up where it was.
    pub fn cancel_break(&mut self) -> Vec<Action> {
        match self.mode {
            Mode::BreakPrompt {
                resume: Some(run), ..
            } => {
                self.mode = Mode::Timer(run);
                if run == Run::Running {
                    self.acquire(Channel::Task);
                }
                info!(remaining = self.remaining_secs, ?run, "break declined, countdown continues");
                return Vec::new();
            }
            Mode::BreakPrompt { resume: None, .. } => {}
            Mode::Break(_) => {
                self.release();
                self.break_remaining_secs = 0;
                info!("break cancelled");
            }
            _ => return Vec::new(),
        }
        self.mode = Mode::View;
        self.reset_remaining();
        Vec::new()
    }

    // --- edit ---

    pub fn open_edit(&mut self) -> Vec<Action> {
        if self.mode != Mode::View {
            return Vec::new();
        }
        if let Some(task) = &self.task {
            self.mode = Mode::Edit(task.clone());
        }
        Vec::new()
    }

    fn with_draft(&mut self, f: impl FnOnce(&mut Task, &Limits)) -> Vec<Action> {
        match &mut self.mode {
            Mode::Edit(draft) => {
                f(draft, &self.limits);
                vec![Action::Feedback(Feedback::Selection)]
            }
            _ => Vec::new(),
        }
    }

    pub fn on_name_change(&mut self, name: String) -> Vec<Action> {
        match &mut self.mode {
            Mode::Edit(draft) => {
                draft.name = name;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    pub fn on_emoji_change(&mut self, emoji: String) -> Vec<Action> {
        self.with_draft(|draft, _| draft.emoji = emoji)
    }

    pub fn on_color_change(&mut self, color: AccentColor) -> Vec<Action> {
        self.with_draft(|draft, _| draft.color = color)
    }

    /// Raw duration from a picker; clamped when the draft is saved.
    pub fn on_duration_change(&mut self, minutes: u32) -> Vec<Action> {
        self.with_draft(|draft, _| draft.duration_minutes = minutes)
    }

    pub fn adjust_duration(&mut self, direction: Direction) -> Vec<Action> {
        self.with_draft(|draft, limits| {
            draft.duration_minutes =
                adjust(draft.duration_minutes, direction, limits.task_step, limits.task);
        })
    }

    pub fn confirm_edit(&mut self) -> Vec<Action> {
        let draft = match &self.mode {
            Mode::Edit(draft) => draft.clone(),
            _ => return Vec::new(),
        };
        self.mode = Mode::View;
        let previous_name = self.task.as_ref().map(|t| t.name.clone()).unwrap_or_default();
        let name = if draft.name.trim().is_empty() {
            previous_name
        } else {
            draft.name.trim().to_string()
        };
        let task = Task {
            name,
            duration_minutes: self.limits.task.clamp(draft.duration_minutes),
            ..draft
        };
        info!(name = %task.name, minutes = task.duration_minutes, "task saved");
        self.task = Some(task);
        self.reset_remaining();
        vec![Action::Feedback(Feedback::Success)]
    }

    pub fn cancel_edit(&mut self) -> Vec<Action> {
        if matches!(self.mode, Mode::Edit(_)) {
            self.mode = Mode::View;
        }
        Vec::new()
    }

    // --- delete ---

    pub fn request_delete(&mut self) -> Vec<Action> {
        if self.task.is_none() {
            return Vec::new();
        }
        let draft = match &self.mode {
            Mode::View => None,
            Mode::Edit(draft) => Some(draft.clone()),
            _ => return Vec::new(),
        };
        self.hold.cancel();
        self.mode = Mode::Delete { draft };
        Vec::new()
    }

    /// Only a sustained press deletes; a tap is ignored.
    pub fn confirm_delete(&mut self, gesture: Gesture) -> Vec<Action> {
        if !matches!(self.mode, Mode::Delete { .. }) {
            return Vec::new();
        }
        if gesture != Gesture::Hold {
            debug!("delete tap ignored, hold to confirm");
            return Vec::new();
        }
        self.release();
        self.hold.cancel();
        self.task = None;
        self.remaining_secs = 0;
        self.mode = Mode::View;
        info!("task deleted");
        vec![Action::Feedback(Feedback::Error)]
    }

    pub fn press_delete(&mut self) -> Vec<Action> {
        if matches!(self.mode, Mode::Delete { .. }) {
            self.hold.press();
        }
        Vec::new()
    }

    pub fn release_delete(&mut self) -> Vec<Action> {
        if !matches!(self.mode, Mode::Delete { .. }) {
            return Vec::new();
        }
        match self.hold.release() {
            Some(gesture) => self.confirm_delete(gesture),
            None => Vec::new(),
        }
    }

    pub fn cancel_delete(&mut self) -> Vec<Action> {
        let draft = match &self.mode {
            Mode::Delete { draft } => draft.clone(),
            _ => return Vec::new(),
        };
        self.hold.cancel();
        self.mode = match draft {
            Some(draft) => Mode::Edit(draft),
            None => Mode::View,
        };
        Vec::new()
    }

    /// Confirm a delete whose press has been held past the threshold.
    pub fn check_hold(&mut self) -> Vec<Action> {
        if matches!(self.mode, Mode::Delete { .. }) && self.hold.check() {
            return self.confirm_delete(Gesture::Hold);
        }
        Vec::new()
    }

    /// When `check_hold()` next needs to run, or None if nothing is pressed.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.hold.next_deadline()
    }

    // --- host lifecycle ---

    /// The host went to the background: stop ticking, keep the clock.
    pub fn background(&mut self) -> Vec<Action> {
        self.release();
        self.hold.cancel();
        match self.mode {
            Mode::Timer(Run::Running) => self.mode = Mode::Timer(Run::Paused),
            Mode::Break(Run::Running) => self.mode = Mode::Break(Run::Paused),
            Mode::BreakPrompt {
                ref mut resume, ..
            } => {
                if *resume == Some(Run::Running) {
                    *resume = Some(Run::Paused);
                }
            }
            _ => {}
        }
        info!(mode = ?self.mode.kind(), paused = self.is_paused(), "backgrounded");
        Vec::new()
    }

    /// Back in the foreground. Elapsed time is not reconciled; a paused
    /// countdown waits for resume.
    pub fn foreground(&mut self) -> Vec<Action> {
        info!(mode = ?self.mode.kind(), paused = self.is_paused(), "foregrounded");
        Vec::new()
    }

    // --- internals ---

    fn reset_remaining(&mut self) {
        self.remaining_secs = self.task.as_ref().map_or(0, Task::duration_secs);
    }

    fn acquire(&mut self, channel: Channel) {
        self.tick
            .acquire(&mut self.scheduler, channel, self.tick_interval);
    }

    fn release(&mut self) {
        self.tick.release(&mut self.scheduler);
    }
}

impl<S: Scheduler> Drop for TimerWidget<S> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticker::testing::ManualScheduler;
    use stacktimer_core::limits::Variant;

    fn config(variant: Variant) -> Config {
        let mut config = Config::default();
        config.general.variant = variant;
        config.general.hold_ms = 50;
        config
    }

    fn make_widget(variant: Variant) -> (TimerWidget<ManualScheduler>, ManualScheduler) {
        let sched = ManualScheduler::default();
        (TimerWidget::new(&config(variant), sched.clone()), sched)
    }

    fn walk_luna(widget: &mut TimerWidget<ManualScheduler>) {
        widget.open_edit();
        widget.on_name_change("Walk Luna".into());
        widget.on_duration_change(30);
        widget.confirm_edit();
    }

    /// Id of the tick currently live in the scheduler.
    fn live_tick(sched: &ManualScheduler) -> TickId {
        let live = sched.log.borrow().live();
        assert_eq!(live.len(), 1, "exactly one live tick expected, got {:?}", live);
        live[0]
    }

    fn tick_n(widget: &mut TimerWidget<ManualScheduler>, sched: &ManualScheduler, n: u32) -> Vec<Action> {
        let id = live_tick(sched);
        let mut all = Vec::new();
        for _ in 0..n {
            all.extend(widget.tick(id));
        }
        all
    }

    fn completions(actions: &[Action], channel: Channel) -> usize {
        actions
            .iter()
            .filter(|a| **a == Action::Completed(channel))
            .count()
    }

    // --- initial state ---

    #[test]
    fn starts_in_view_with_default_task() {
        let (w, _) = make_widget(Variant::Stack);
        assert_eq!(w.mode(), ModeKind::View);
        assert_eq!(w.task(), Some(&Task::default()));
        assert_eq!(w.remaining_secs(), 45 * 60);
        assert!(!w.is_paused());
        assert_eq!(w.active_tick(), None);
    }

    // --- countdown ---

    #[test]
    fn start_acquires_task_tick_with_configured_interval() {
        let (mut w, sched) = make_widget(Variant::Stack);
        let actions = w.start();
        assert_eq!(actions, vec![Action::Feedback(Feedback::Impact)]);
        assert_eq!(w.mode(), ModeKind::Timer);
        assert_eq!(w.active_tick(), Some(Channel::Task));
        assert_eq!(sched.log.borrow().scheduled[0].1, Duration::from_secs(1));
    }

    #[test]
    fn each_tick_takes_one_second() {
        let (mut w, sched) = make_widget(Variant::Stack);
        w.start();
        tick_n(&mut w, &sched, 3);
        assert_eq!(w.remaining_secs(), 45 * 60 - 3);
    }

    #[test]
    fn ticking_full_duration_completes_once_and_enters_break() {
        let (mut w, sched) = make_widget(Variant::Classic);
        walk_luna(&mut w);
        w.start();
        let actions = tick_n(&mut w, &sched, 1800);
        assert_eq!(w.remaining_secs(), 0);
        assert_eq!(completions(&actions, Channel::Task), 1);
        assert_eq!(w.mode(), ModeKind::Break);
        assert_eq!(w.break_remaining_secs(), 5 * 60);
        assert_eq!(w.active_tick(), Some(Channel::Break));
    }

    #[test]
    fn extra_ticks_after_completion_are_stale() {
        let (mut w, sched) = make_widget(Variant::Classic);
        walk_luna(&mut w);
        w.start();
        let task_tick = live_tick(&sched);
        for _ in 0..1800 {
            w.tick(task_tick);
        }
        let actions = w.tick(task_tick);
        assert!(actions.is_empty());
        assert_eq!(w.remaining_secs(), 0, "never negative");
        assert_eq!(w.break_remaining_secs(), 5 * 60, "break untouched by stale tick");
    }

    #[test]
    fn task_and_break_ticks_are_never_live_together() {
        let (mut w, sched) = make_widget(Variant::Classic);
        w.start();
        tick_n(&mut w, &sched, 45 * 60);
        assert_eq!(sched.log.borrow().live().len(), 1);
        assert_eq!(w.active_tick(), Some(Channel::Break));
    }

    #[test]
    fn start_without_task_is_a_no_op() {
        let (mut w, sched) = make_widget(Variant::Stack);
        w.request_delete();
        w.confirm_delete(Gesture::Hold);
        assert!(w.start().is_empty());
        assert_eq!(w.mode(), ModeKind::View);
        assert!(sched.log.borrow().scheduled.is_empty());
    }

    #[test]
    fn start_outside_view_is_a_no_op() {
        let (mut w, sched) = make_widget(Variant::Stack);
        w.start();
        assert!(w.start().is_empty());
        assert_eq!(sched.log.borrow().scheduled.len(), 1);
    }

    // --- pause / resume ---

    #[test]
    fn pause_keeps_remaining_and_releases_tick() {
        let (mut w, sched) = make_widget(Variant::Stack);
        w.start();
        let id = live_tick(&sched);
        tick_n(&mut w, &sched, 10);
        let remaining = w.remaining_secs();

        w.pause();
        assert!(w.is_paused());
        assert_eq!(w.active_tick(), None);
        // a tick already in flight must not decrement
        assert!(w.tick(id).is_empty());
        assert_eq!(w.remaining_secs(), remaining);

        w.resume();
        assert!(!w.is_paused());
        assert_eq!(w.remaining_secs(), remaining);
        tick_n(&mut w, &sched, 1);
        assert_eq!(w.remaining_secs(), remaining - 1);
    }

    #[test]
    fn resume_acquires_a_fresh_tick() {
        let (mut w, sched) = make_widget(Variant::Stack);
        w.start();
        let first = live_tick(&sched);
        w.pause();
        w.resume();
        let second = live_tick(&sched);
        assert_ne!(first, second);
    }

    #[test]
    fn pause_in_view_is_a_no_op() {
        let (mut w, _) = make_widget(Variant::Stack);
        assert!(w.pause().is_empty());
        assert!(w.resume().is_empty());
        assert!(!w.is_paused());
    }

    // --- cancel ---

    #[test]
    fn cancel_timer_resets_remaining_idempotently() {
        let (mut w, sched) = make_widget(Variant::Stack);
        w.start();
        tick_n(&mut w, &sched, 100);
        w.cancel_timer();
        assert_eq!(w.mode(), ModeKind::View);
        assert_eq!(w.remaining_secs(), 45 * 60);
        assert_eq!(w.active_tick(), None);

        w.cancel_timer();
        assert_eq!(w.remaining_secs(), 45 * 60);
        assert_eq!(sched.log.borrow().cancelled.len(), 1);
    }

    #[test]
    fn cancel_timer_while_paused_returns_to_view() {
        let (mut w, _) = make_widget(Variant::Stack);
        w.start();
        w.pause();
        w.cancel_timer();
        assert_eq!(w.mode(), ModeKind::View);
        assert!(!w.is_paused());
    }

    // --- break flow: countdown ---

    #[test]
    fn finish_early_goes_straight_to_break_in_countdown_flow() {
        let (mut w, sched) = make_widget(Variant::Classic);
        w.start();
        tick_n(&mut w, &sched, 5);
        let actions = w.finish_early();
        assert_eq!(actions, vec![Action::Feedback(Feedback::Impact)]);
        assert_eq!(w.mode(), ModeKind::Break);
        assert_eq!(w.break_remaining_secs(), 300);
        assert!(w.task().is_some(), "classic keeps the task");
    }

    #[test]
    fn break_completion_returns_to_view_with_fresh_clock() {
        let (mut w, sched) = make_widget(Variant::Classic);
        w.start();
        w.finish_early();
        let actions = tick_n(&mut w, &sched, 300);
        assert_eq!(completions(&actions, Channel::Break), 1);
        assert_eq!(w.mode(), ModeKind::View);
        assert_eq!(w.break_remaining_secs(), 0);
        assert_eq!(w.remaining_secs(), 45 * 60);
        assert_eq!(w.active_tick(), None);
    }

    #[test]
    fn break_can_be_paused_and_resumed() {
        let (mut w, sched) = make_widget(Variant::Classic);
        w.start();
        w.finish_early();
        tick_n(&mut w, &sched, 10);
        w.pause();
        assert!(w.is_paused());
        assert_eq!(w.break_remaining_secs(), 290);
        w.resume();
        tick_n(&mut w, &sched, 1);
        assert_eq!(w.break_remaining_secs(), 289);
    }

    #[test]
    fn cancel_break_releases_tick() {
        let (mut w, _) = make_widget(Variant::Classic);
        w.start();
        w.finish_early();
        w.cancel_break();
        assert_eq!(w.mode(), ModeKind::View);
        assert_eq!(w.active_tick(), None);
        assert_eq!(w.break_remaining_secs(), 0);
    }

    // --- break flow: prompt ---

    #[test]
    fn finish_early_offers_a_break_in_prompt_flow() {
        let (mut w, _) = make_widget(Variant::Stack);
        w.start();
        w.finish_early();
        assert_eq!(w.mode(), ModeKind::BreakPrompt);
        assert_eq!(w.snapshot().break_prompt_minutes, Some(5));
        assert_eq!(w.active_tick(), None, "no countdown while prompting");
        assert!(w.task().is_some(), "task survives until the break is taken");
    }

    #[test]
    fn adjust_break_clamps_to_bounds() {
        let (mut w, _) = make_widget(Variant::Stack);
        w.start();
        w.finish_early();
        for _ in 0..40 {
            w.adjust_break(Direction::Increase);
        }
        assert_eq!(w.snapshot().break_prompt_minutes, Some(30));
        for _ in 0..40 {
            w.adjust_break(Direction::Decrease);
        }
        assert_eq!(w.snapshot().break_prompt_minutes, Some(1));
    }

    #[test]
    fn confirm_break_consumes_task_and_starts_break() {
        let (mut w, _) = make_widget(Variant::Stack);
        w.start();
        w.finish_early();
        let actions = w.confirm_break(Some(10));
        assert_eq!(actions, vec![Action::Feedback(Feedback::Success)]);
        assert_eq!(w.mode(), ModeKind::Break);
        assert_eq!(w.break_remaining_secs(), 600);
        assert!(w.task().is_none());
    }

    #[test]
    fn confirm_break_clamps_minutes() {
        let (mut w, _) = make_widget(Variant::Stack);
        w.start();
        w.finish_early();
        w.confirm_break(Some(90));
        assert_eq!(w.break_remaining_secs(), 30 * 60);
    }

    #[test]
    fn confirm_break_without_minutes_uses_adjusted_prompt() {
        let (mut w, _) = make_widget(Variant::Stack);
        w.start();
        w.finish_early();
        for _ in 0..5 {
            w.adjust_break(Direction::Increase);
        }
        assert_eq!(w.snapshot().break_prompt_minutes, Some(10));
        w.confirm_break(None);
        assert_eq!(w.break_remaining_secs(), 10 * 60);
    }

    #[test]
    fn declining_break_after_finish_early_continues_countdown() {
        let (mut w, sched) = make_widget(Variant::Stack);
        w.start();
        tick_n(&mut w, &sched, 600);
        assert_eq!(w.remaining_secs(), 2100);

        w.finish_early();
        w.cancel_break();
        assert_eq!(w.mode(), ModeKind::Timer);
        assert!(!w.is_paused());
        assert!(w.task().is_some());
        assert_eq!(w.remaining_secs(), 2100, "progress kept");
        assert_eq!(w.active_tick(), Some(Channel::Task));

        tick_n(&mut w, &sched, 1);
        assert_eq!(w.remaining_secs(), 2099);
    }

    #[test]
    fn declining_break_after_finish_early_while_paused_stays_paused() {
        let (mut w, sched) = make_widget(Variant::Stack);
        w.start();
        tick_n(&mut w, &sched, 10);
        w.pause();
        w.finish_early();
        w.cancel_break();
        assert_eq!(w.mode(), ModeKind::Timer);
        assert!(w.is_paused());
        assert_eq!(w.remaining_secs(), 45 * 60 - 10);
        assert_eq!(w.active_tick(), None);
    }

    #[test]
    fn declining_break_after_completion_returns_to_view() {
        let (mut w, sched) = make_widget(Variant::Stack);
        w.start();
        tick_n(&mut w, &sched, 45 * 60);
        assert_eq!(w.mode(), ModeKind::BreakPrompt);
        w.cancel_break();
        assert_eq!(w.mode(), ModeKind::View);
        assert_eq!(w.active_tick(), None);
    }

    #[test]
    fn completion_consumes_task_then_break_ends_empty() {
        let (mut w, sched) = make_widget(Variant::Stack);
        w.start();
        let actions = tick_n(&mut w, &sched, 45 * 60);
        assert_eq!(completions(&actions, Channel::Task), 1);
        assert_eq!(w.mode(), ModeKind::BreakPrompt);
        assert!(w.task().is_none());

        w.confirm_break(Some(1));
        tick_n(&mut w, &sched, 60);
        assert_eq!(w.mode(), ModeKind::View);
        assert!(w.task().is_none());
        assert_eq!(w.remaining_secs(), 0);
    }

    // --- empty state ---

    #[test]
    fn add_task_installs_default_only_when_empty() {
        let (mut w, _) = make_widget(Variant::Stack);
        walk_luna(&mut w);
        w.add_task();
        assert_eq!(w.task().unwrap().name, "Walk Luna");

        w.request_delete();
        w.confirm_delete(Gesture::Hold);
        w.add_task();
        assert_eq!(w.task(), Some(&Task::default()));
        assert_eq!(w.remaining_secs(), 45 * 60);
    }

    // --- edit ---

    #[test]
    fn draft_increment_uses_variant_step() {
        let (mut classic, _) = make_widget(Variant::Classic);
        classic.open_edit();
        classic.on_duration_change(30);
        classic.adjust_duration(Direction::Increase);
        assert_eq!(classic.snapshot().draft.unwrap().duration_minutes, 31);

        let (mut stack, _) = make_widget(Variant::Stack);
        stack.open_edit();
        stack.on_duration_change(30);
        stack.adjust_duration(Direction::Increase);
        assert_eq!(stack.snapshot().draft.unwrap().duration_minutes, 35);
    }

    #[test]
    fn draft_increment_saturates_at_max() {
        let (mut w, _) = make_widget(Variant::Stack);
        w.open_edit();
        w.on_duration_change(118);
        w.adjust_duration(Direction::Increase);
        w.adjust_duration(Direction::Increase);
        assert_eq!(w.snapshot().draft.unwrap().duration_minutes, 120);
    }

    #[test]
    fn save_clamps_duration_and_resets_clock() {
        let (mut w, _) = make_widget(Variant::Classic);
        w.open_edit();
        w.on_duration_change(500);
        w.on_emoji_change("🐶".into());
        w.on_color_change(AccentColor::Green);
        let actions = w.confirm_edit();
        assert_eq!(actions, vec![Action::Feedback(Feedback::Success)]);
        let task = w.task().unwrap();
        assert_eq!(task.duration_minutes, 60);
        assert_eq!(task.emoji, "🐶");
        assert_eq!(task.color, AccentColor::Green);
        assert_eq!(w.remaining_secs(), 3600);
        assert_eq!(w.mode(), ModeKind::View);
    }

    #[test]
    fn blank_name_keeps_previous_name() {
        let (mut w, _) = make_widget(Variant::Stack);
        w.open_edit();
        w.on_name_change("   ".into());
        w.confirm_edit();
        assert_eq!(w.task().unwrap().name, "Read a book");
    }

    #[test]
    fn cancel_edit_discards_draft() {
        let (mut w, _) = make_widget(Variant::Stack);
        w.open_edit();
        w.on_duration_change(90);
        w.on_color_change(AccentColor::Red);
        w.cancel_edit();
        assert_eq!(w.mode(), ModeKind::View);
        assert_eq!(w.task(), Some(&Task::default()));
    }

    #[test]
    fn draft_changes_outside_edit_are_ignored() {
        let (mut w, _) = make_widget(Variant::Stack);
        assert!(w.on_emoji_change("🐱".into()).is_empty());
        assert!(w.adjust_duration(Direction::Increase).is_empty());
        assert_eq!(w.task(), Some(&Task::default()));
    }

    #[test]
    fn edit_cannot_open_while_timing() {
        let (mut w, _) = make_widget(Variant::Stack);
        w.start();
        w.open_edit();
        assert_eq!(w.mode(), ModeKind::Timer);
    }

    // --- delete ---

    #[test]
    fn tap_does_not_delete() {
        let (mut w, _) = make_widget(Variant::Stack);
        w.request_delete();
        assert!(w.confirm_delete(Gesture::Tap).is_empty());
        assert_eq!(w.mode(), ModeKind::Delete);
        assert!(w.task().is_some());
    }

    #[test]
    fn quick_press_and_release_does_not_delete() {
        let (mut w, _) = make_widget(Variant::Stack);
        w.request_delete();
        w.press_delete();
        assert!(w.release_delete().is_empty());
        assert!(w.task().is_some());
    }

    #[test]
    fn hold_gesture_deletes() {
        let (mut w, _) = make_widget(Variant::Stack);
        w.request_delete();
        let actions = w.confirm_delete(Gesture::Hold);
        assert_eq!(actions, vec![Action::Feedback(Feedback::Error)]);
        assert!(w.task().is_none());
        assert_eq!(w.mode(), ModeKind::View);
        assert_eq!(w.remaining_secs(), 0);
    }

    #[test]
    fn press_held_past_threshold_deletes_on_check() {
        let (mut w, _) = make_widget(Variant::Stack);
        w.request_delete();
        w.press_delete();
        assert!(w.check_hold().is_empty());
        assert!(w.next_deadline().is_some());
        std::thread::sleep(Duration::from_millis(60));
        let actions = w.check_hold();
        assert_eq!(actions, vec![Action::Feedback(Feedback::Error)]);
        assert!(w.task().is_none());
        assert!(w.next_deadline().is_none());
    }

    #[test]
    fn press_held_past_threshold_deletes_on_release() {
        let (mut w, _) = make_widget(Variant::Stack);
        w.request_delete();
        w.press_delete();
        std::thread::sleep(Duration::from_millis(60));
        assert_eq!(w.release_delete(), vec![Action::Feedback(Feedback::Error)]);
        assert!(w.task().is_none());
    }

    #[test]
    fn cancel_delete_returns_to_edit_with_draft() {
        let (mut w, _) = make_widget(Variant::Stack);
        w.open_edit();
        w.on_duration_change(60);
        w.request_delete();
        assert_eq!(w.mode(), ModeKind::Delete);
        w.cancel_delete();
        assert_eq!(w.mode(), ModeKind::Edit);
        assert_eq!(w.snapshot().draft.unwrap().duration_minutes, 60);
    }

    #[test]
    fn cancel_delete_from_view_returns_to_view() {
        let (mut w, _) = make_widget(Variant::Stack);
        w.request_delete();
        w.press_delete();
        w.cancel_delete();
        assert_eq!(w.mode(), ModeKind::View);
        assert!(w.next_deadline().is_none(), "pending press dropped");
    }

    #[test]
    fn delete_cannot_be_requested_while_timing() {
        let (mut w, _) = make_widget(Variant::Stack);
        w.start();
        w.request_delete();
        assert_eq!(w.mode(), ModeKind::Timer);
    }

    // --- lifecycle ---

    #[test]
    fn background_pauses_and_releases_tick() {
        let (mut w, sched) = make_widget(Variant::Stack);
        w.start();
        let id = live_tick(&sched);
        tick_n(&mut w, &sched, 3);
        w.background();
        assert!(w.is_paused());
        assert_eq!(w.active_tick(), None);
        assert!(w.tick(id).is_empty());

        w.foreground();
        assert!(w.is_paused(), "foreground does not auto-resume");
        assert_eq!(w.remaining_secs(), 45 * 60 - 3);
    }

    #[test]
    fn background_pauses_break_too() {
        let (mut w, _) = make_widget(Variant::Classic);
        w.start();
        w.finish_early();
        w.background();
        assert_eq!(w.mode(), ModeKind::Break);
        assert!(w.is_paused());
    }

    #[test]
    fn background_during_break_prompt_resumes_paused() {
        let (mut w, _) = make_widget(Variant::Stack);
        w.start();
        w.finish_early();
        w.background();
        w.cancel_break();
        assert_eq!(w.mode(), ModeKind::Timer);
        assert!(w.is_paused());
        assert_eq!(w.active_tick(), None);
    }

    #[test]
    fn dropping_widget_releases_tick() {
        let (mut w, sched) = make_widget(Variant::Stack);
        w.start();
        let id = live_tick(&sched);
        drop(w);
        assert_eq!(sched.log.borrow().cancelled, vec![id]);
        assert!(sched.log.borrow().live().is_empty());
    }

    #[test]
    fn every_exit_from_timer_releases_tick() {
        for exit in ["pause", "cancel", "finish_early", "background"] {
            let (mut w, sched) = make_widget(Variant::Stack);
            w.start();
            match exit {
                "pause" => w.pause(),
                "cancel" => w.cancel_timer(),
                "finish_early" => w.finish_early(),
                _ => w.background(),
            };
            assert!(sched.log.borrow().live().is_empty(), "{} left a tick running", exit);
        }
    }

    // --- snapshot ---

    #[test]
    fn snapshot_formats_remaining() {
        let (mut w, sched) = make_widget(Variant::Stack);
        w.start();
        tick_n(&mut w, &sched, 61);
        let snap = w.snapshot();
        assert_eq!(snap.mode, ModeKind::Timer);
        assert_eq!(snap.remaining, "43:59");
        assert!(!snap.paused);
        assert!(snap.draft.is_none());
    }
}
