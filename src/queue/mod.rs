pub mod rebalance;

use rand::seq::SliceRandom;
use rand::Rng;
use crate::subjects::model::SubjectInCycle;

/// Shuffled study queue: each active subject's id repeated `num_blocks` times.
pub fn generate_study_queue<R: Rng + ?Sized>(subjects: &[SubjectInCycle], rng: &mut R) -> Vec<i64> {
    let mut queue: Vec<i64> = subjects
        .iter()
        .filter(|s| s.is_active)
        .flat_map(|s| std::iter::repeat(s.id).take(s.num_blocks as usize))
        .collect();
    queue.shuffle(rng);
    queue
}

/// Queue shuffled with the thread-local generator
pub fn shuffled_study_queue(subjects: &[SubjectInCycle]) -> Vec<i64> {
    generate_study_queue(subjects, &mut rand::thread_rng())
}
