/// Collapses bursts of calls into one delayed call.
/// Driven by the host clock: pass the current time (ms) to `invoke` and `poll`.
pub struct Debounce<F: FnMut()> {
    /// Quiet period before the callback runs.
    delay: f64,
    callback: F,
    /// When the pending call is due.
    deadline: Option<f64>,
}

impl<F: FnMut()> Debounce<F> {
    pub fn new(delay: f64, callback: F) -> Self {
        Self {
            delay,
            callback,
            deadline: None,
        }
    }

    /// Cancel any pending call. With `immediate`, run the callback now;
    /// otherwise schedule it `delay` ms from `now`.
    pub fn invoke(&mut self, now: f64, immediate: bool) {
        self.deadline = None;
        if immediate {
            (self.callback)();
        } else {
            self.deadline = Some(now + self.delay);
        }
    }

    /// Run the pending call if it is due. Returns whether it ran.
    pub fn poll(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(due) if now >= due => {
                self.deadline = None;
                (self.callback)();
                true
            }
            _ => false,
        }
    }

    /// Run the pending call now, whatever its deadline. Returns whether one
    /// was pending. Timer-driven hosts call this when their timeout fires.
    pub fn flush(&mut self) -> bool {
        if self.deadline.take().is_some() {
            (self.callback)();
            true
        } else {
            false
        }
    }

    /// Drop the pending call, if any.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn delay(&self) -> f64 {
        self.delay
    }
}

/// Forwards at most one call per window; calls inside the window are dropped.
pub struct Throttle<A, F: FnMut(A)> {
    /// Window length in ms.
    window: f64,
    callback: F,
    /// End of the current cooldown window.
    cooldown_until: Option<f64>,
    _args: std::marker::PhantomData<fn(A)>,
}

impl<A, F: FnMut(A)> Throttle<A, F> {
    pub fn new(window: f64, callback: F) -> Self {
        Self {
            window,
            callback,
            cooldown_until: None,
            _args: std::marker::PhantomData,
        }
    }

    /// Forward `args` unless cooling down. Returns whether it was forwarded.
    pub fn call(&mut self, now: f64, args: A) -> bool {
        if let Some(until) = self.cooldown_until {
            if now < until {
                return false;
            }
        }
        (self.callback)(args);
        self.cooldown_until = Some(now + self.window);
        true
    }

    /// Whether a call at `now` would be dropped.
    pub fn is_cooling_down(&self, now: f64) -> bool {
        self.cooldown_until.is_some_and(|until| now < until)
    }

    pub fn window(&self) -> f64 {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn debounce_collapses_burst() {
        let calls = Cell::new(0);
        let mut save = Debounce::new(100.0, || calls.set(calls.get() + 1));

        for t in [0.0, 20.0, 40.0, 60.0, 80.0] {
            save.invoke(t, false);
            assert!(!save.poll(t));
        }
        // Timer restarted at 80ms, so 150ms is still quiet.
        assert!(!save.poll(150.0));
        assert_eq!(calls.get(), 0);

        assert!(save.poll(180.0));
        assert_eq!(calls.get(), 1);
        assert!(!save.poll(400.0));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn debounce_immediate_cancels_pending() {
        let calls = Cell::new(0);
        let mut save = Debounce::new(100.0, || calls.set(calls.get() + 1));

        save.invoke(0.0, false);
        assert!(save.is_pending());
        save.invoke(10.0, true);
        assert_eq!(calls.get(), 1);
        assert!(!save.is_pending());
        assert!(!save.poll(500.0));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn debounce_cancel() {
        let calls = Cell::new(0);
        let mut save = Debounce::new(50.0, || calls.set(calls.get() + 1));
        save.invoke(0.0, false);
        save.cancel();
        assert!(!save.poll(100.0));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn debounce_flush_runs_pending_call_once() {
        let calls = Cell::new(0);
        let mut save = Debounce::new(100.0, || calls.set(calls.get() + 1));

        assert!(!save.flush());
        for t in [0.0, 20.0, 40.0, 60.0, 80.0] {
            save.invoke(t, false);
        }
        assert!(save.flush());
        assert_eq!(calls.get(), 1);
        assert!(!save.is_pending());
        assert!(!save.flush());
        assert!(!save.poll(1000.0));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn throttle_forwards_first_and_drops_rest() {
        let seen = std::cell::RefCell::new(Vec::new());
        let mut drag = Throttle::new(300.0, |(x, y): (i32, i32)| seen.borrow_mut().push((x, y)));

        let forwarded: Vec<bool> = (0..5).map(|i| drag.call(i as f64 * 50.0, (i, i * 2))).collect();
        assert_eq!(forwarded, vec![true, false, false, false, false]);
        assert!(drag.is_cooling_down(250.0));

        assert!(drag.call(300.0, (9, 9)));
        assert_eq!(*seen.borrow(), vec![(0, 0), (9, 9)]);
        assert!(drag.is_cooling_down(599.0));
        assert!(!drag.is_cooling_down(600.0));
    }
}
