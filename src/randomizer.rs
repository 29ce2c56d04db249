use crate::model::Question;
use rand::seq::SliceRandom;
use rand::Rng;

/// Builds the frozen working set: exactly `target` questions drawn from
/// `pool` in uniform random order.
///
/// Larger pools are shuffled and truncated. Smaller pools are shuffled and
/// padded with uniform draws (with replacement) from the original pool, so
/// duplicates are possible there; that is the intended degradation, not an
/// error. Callers guarantee a non-empty pool.
pub fn working_set<R: Rng + ?Sized>(pool: &[Question], target: usize, rng: &mut R) -> Vec<Question> {
    debug_assert!(!pool.is_empty());

    let mut working: Vec<Question> = pool.to_vec();
    working.shuffle(rng);

    if working.len() > target {
        working.truncate(target);
    } else {
        while working.len() < target {
            let pick = rng.gen_range(0..pool.len());
            working.push(pool[pick].clone());
        }
    }
    working
}
