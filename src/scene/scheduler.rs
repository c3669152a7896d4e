use std::time::Duration;

/// Handle for cancelling a scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

struct Entry<T> {
    id: TaskId,
    due: Duration,
    period: Option<Duration>,
    task: T,
}

/// Timer queue on a virtual clock measured from scene start.
///
/// Nothing fires on its own: the owner calls [`Scheduler::due`] with the
/// current time and runs whatever comes back, so every timer can be
/// cancelled deterministically before teardown.
pub struct Scheduler<T> {
    entries: Vec<Entry<T>>,
    next_id: u64,
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self { entries: Vec::new(), next_id: 0 }
    }

    fn insert(&mut self, due: Duration, period: Option<Duration>, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, due, period, task });
        id
    }

    /// Fires once at `now + delay`.
    pub fn once(&mut self, now: Duration, delay: Duration, task: T) -> TaskId {
        self.insert(now + delay, None, task)
    }

    /// Fires every `period`, first at `now + period`. A zero period is
    /// treated as one millisecond so a repeating task cannot spin.
    pub fn every(&mut self, now: Duration, period: Duration, task: T) -> TaskId {
        let period = period.max(Duration::from_millis(1));
        self.insert(now + period, Some(period), task)
    }

    /// Returns whether the task was still pending.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pops the earliest task due at or before `now`, with its id and the
    /// time it was due.
    ///
    /// Repeating tasks fire once per call and are rescheduled on their
    /// next period boundary after `now`; missed periods are skipped, not
    /// replayed. Ties run in scheduling order. Call in a loop until `None`;
    /// tasks scheduled while draining are picked up if they are already due.
    pub fn due(&mut self, now: Duration) -> Option<(TaskId, Duration, T)> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= now)
            .min_by_key(|(_, entry)| (entry.due, entry.id.0))
            .map(|(index, _)| index)?;

        let entry = &mut self.entries[index];
        let fired = (entry.id, entry.due, entry.task.clone());
        match entry.period {
            Some(period) => {
                while entry.due <= now {
                    entry.due += period;
                }
            }
            None => {
                self.entries.remove(index);
            }
        }
        Some(fired)
    }
}

impl<T: Clone> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn drain(s: &mut Scheduler<&'static str>, now: Duration) -> Vec<&'static str> {
        std::iter::from_fn(|| s.due(now).map(|(_, _, t)| t)).collect()
    }

    #[test]
    fn fires_in_due_order() {
        let mut s = Scheduler::new();
        s.once(ms(0), ms(300), "late");
        s.once(ms(0), ms(100), "early");
        s.once(ms(0), ms(100), "early-second");

        assert!(drain(&mut s, ms(50)).is_empty());
        assert_eq!(drain(&mut s, ms(300)), vec!["early", "early-second", "late"]);
        assert!(s.is_empty());
    }

    #[test]
    fn zero_delay_fires_on_next_poll() {
        let mut s = Scheduler::new();
        s.once(ms(1000), Duration::ZERO, "now");
        assert_eq!(drain(&mut s, ms(1000)), vec!["now"]);
    }

    #[test]
    fn repeating_skips_missed_periods_and_cancels() {
        let mut s = Scheduler::new();
        let id = s.every(ms(0), ms(800), "spawn");

        assert_eq!(drain(&mut s, ms(799)).len(), 0);
        assert_eq!(drain(&mut s, ms(2400)).len(), 1);
        assert!(drain(&mut s, ms(2401)).is_empty());
        assert_eq!(drain(&mut s, ms(3200)).len(), 1);
        assert!(s.is_pending(id));

        assert!(s.cancel(id));
        assert!(!s.cancel(id));
        assert!(drain(&mut s, ms(10_000)).is_empty());
    }

    #[test]
    fn cancel_all_drops_everything() {
        let mut s = Scheduler::new();
        s.every(ms(0), ms(10), "a");
        s.once(ms(0), ms(10), "b");
        s.cancel_all();
        assert!(drain(&mut s, ms(100)).is_empty());
    }

    #[test]
    fn reports_scheduled_time_not_poll_time() {
        let mut s = Scheduler::new();
        s.once(ms(0), ms(100), "reveal");
        s.every(ms(0), ms(100), "beat");
        let times: Vec<_> = std::iter::from_fn(|| s.due(ms(250)).map(|(_, at, _)| at)).collect();
        assert_eq!(times, vec![ms(100), ms(100)]);
        assert_eq!(s.due(ms(300)).map(|(_, at, _)| at), Some(ms(300)));
    }

    #[test]
    fn zero_period_does_not_spin() {
        let mut s = Scheduler::new();
        s.every(ms(0), Duration::ZERO, "tick");
        assert_eq!(drain(&mut s, ms(5)).len(), 1);
        assert_eq!(drain(&mut s, ms(6)).len(), 1);
    }
}
