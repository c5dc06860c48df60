//! 可取消的定时器队列：
//! - 每个定时器有一个键，同键再次调度会替换旧的
//! - 时间由调用方显式推进（毫秒），到期项按到期时间、再按调度顺序依次弹出

/// 相对会话开始的毫秒数
pub(crate) type Millis = u64;

#[derive(Debug)]
struct Pending<K, A> {
    due: Millis,
    seq: u64,
    key: K,
    action: A,
}

#[derive(Debug)]
pub(crate) struct TimerQueue<K, A> {
    now: Millis,
    seq: u64,
    pending: Vec<Pending<K, A>>,
}

impl<K: PartialEq, A> Default for TimerQueue<K, A> {
    fn default() -> Self { Self::new() }
}

impl<K: PartialEq, A> TimerQueue<K, A> {
    pub(crate) fn new() -> Self {
        Self { now: 0, seq: 0, pending: Vec::new() }
    }

    pub(crate) fn now(&self) -> Millis { self.now }

    /// 在 `delay` 毫秒后触发；同键的旧定时器被取消
    pub(crate) fn schedule(&mut self, key: K, delay: Millis, action: A) {
        self.cancel(&key);
        self.seq += 1;
        self.pending.push(Pending { due: self.now + delay, seq: self.seq, key, action });
    }

    pub(crate) fn cancel(&mut self, key: &K) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| &p.key != key);
        self.pending.len() != before
    }

    #[cfg(test)]
    pub(crate) fn is_scheduled(&self, key: &K) -> bool {
        self.pending.iter().any(|p| &p.key == key)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize { self.pending.len() }

    /// 弹出 `until` 之前（含）最早到期的一项，并把时钟拨到它的到期时间。
    /// 没有到期项时把时钟拨到 `until` 并返回 None。
    pub(crate) fn pop_due(&mut self, until: Millis) -> Option<(K, A)> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= until)
            .min_by_key(|(_, p)| (p.due, p.seq))
            .map(|(i, _)| i);
        match idx {
            Some(i) => {
                let p = self.pending.swap_remove(i);
                self.now = self.now.max(p.due);
                Some((p.key, p.action))
            }
            None => {
                self.now = self.now.max(until);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_due_order() {
        let mut q: TimerQueue<&str, u8> = TimerQueue::new();
        q.schedule("b", 200, 2);
        q.schedule("a", 100, 1);
        q.schedule("c", 100, 3);
        assert_eq!(q.pop_due(50), None);
        assert_eq!(q.now(), 50);
        assert_eq!(q.pop_due(1000), Some(("a", 1)));
        assert_eq!(q.now(), 100);
        assert_eq!(q.pop_due(1000), Some(("c", 3)));
        assert_eq!(q.pop_due(1000), Some(("b", 2)));
        assert_eq!(q.now(), 200);
        // 延迟从当前时钟算起
        q.schedule("d", 100, 4);
        assert_eq!(q.pop_due(250), None);
        assert_eq!(q.pop_due(300), Some(("d", 4)));
    }

    #[test]
    fn same_due_keeps_schedule_order() {
        let mut q: TimerQueue<&str, u8> = TimerQueue::new();
        q.schedule("x", 10, 1);
        q.schedule("y", 10, 2);
        assert_eq!(q.pop_due(10), Some(("x", 1)));
        assert_eq!(q.pop_due(10), Some(("y", 2)));
        assert_eq!(q.pop_due(10), None);
    }

    #[test]
    fn rescheduling_a_key_replaces_it() {
        let mut q: TimerQueue<&str, u8> = TimerQueue::new();
        q.schedule("btn", 2000, 1);
        let _ = q.pop_due(1500);
        q.schedule("btn", 2000, 2);
        assert_eq!(q.len(), 1);
        assert_eq!(q.pop_due(2000), None);
        assert_eq!(q.pop_due(3500), Some(("btn", 2)));
    }

    #[test]
    fn cancel_removes_pending() {
        let mut q: TimerQueue<u32, ()> = TimerQueue::new();
        q.schedule(7, 100, ());
        assert!(q.is_scheduled(&7));
        assert!(q.cancel(&7));
        assert!(!q.cancel(&7));
        assert_eq!(q.pop_due(1000), None);
    }
}
