use crate::page::{NodeId, PageView};
use crate::schedule::{Scheduler, Task, TimerHandle};

pub const CATEGORY_SELECTOR: &str = ".category";

/// Schedules the staggered reveal: category `i` becomes visible after
/// `delay_ms + i * stagger_ms`
pub fn schedule_reveal<P: PageView + ?Sized>(
    page: &P,
    scheduler: &mut Scheduler,
    delay_ms: u64,
    stagger_ms: u64,
) -> Vec<TimerHandle> {
    page.query_all(CATEGORY_SELECTOR)
        .into_iter()
        .zip(0u64..)
        .map(|(category, index)| {
            scheduler.schedule_once(delay_ms + index * stagger_ms, Task::Reveal(category))
        })
        .collect()
}

pub fn reveal<P: PageView + ?Sized>(page: &mut P, category: NodeId) {
    page.add_class(category, crate::scroll::VISIBLE_CLASS);
}
