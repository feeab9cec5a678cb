use crate::{
    game::{BoardSize, Game, GameStatus, Point},
    minefield::{self, Minefield},
    solver::{self, Solver},
};
use log::{debug, info, warn};
use rand::{thread_rng, Rng};
use std::{
    sync::{
        atomic::{AtomicBool, AtomicU32, Ordering},
        mpsc::{sync_channel, Receiver, TryRecvError},
        Arc,
    },
    thread,
};

pub enum GeneratorStatus {
    Found(Minefield),
    StillSolving,
    Stopped,
}

/// Cells that must stay free of mines: the start and, when the density allows it,
/// its neighbours too so the first click opens an area.
fn safe_zone(size: BoardSize, start: usize) -> Vec<usize> {
    let (x, y) = (start % size.width(), start / size.width());

    let zone = std::iter::once(start)
        .chain(
            minefield::neighbors(size.width(), size.height(), x, y)
                .map(|(x, y)| y * size.width() + x),
        )
        .collect::<Vec<_>>();

    if size.cells() - zone.len() >= size.mines() {
        zone
    } else {
        vec![start]
    }
}

/// Whether `solver` alone can clear `layout` after opening `start`.
pub fn is_guessfree(layout: &Minefield, start: usize, solver: &Arc<dyn Solver>) -> bool {
    let Ok(mut game) = Game::from_layout(layout.clone(), solver.clone()) else {
        return false;
    };

    let start = Point::new(start % layout.width, start / layout.width);
    if game.left_click(start).is_err() {
        return false;
    }

    solver::solve(&mut game) == GameStatus::Won
}

/// Layouts tried before settling for one that may need a guess. Dense boards can
/// have no guess-free layout at all.
pub const MAX_ATTEMPTS: u32 = 10_000;

/// Draws layouts until one can be solved from `start` without guessing. After
/// [`MAX_ATTEMPTS`] it returns a plain random layout that still keeps `start` safe.
/// Returns `None` only once `cancel` is set.
pub fn generate_guessfree<R: Rng + ?Sized>(
    rng: &mut R,
    size: BoardSize,
    start: usize,
    solver: &Arc<dyn Solver>,
    attempts: &AtomicU32,
    cancel: &AtomicBool,
) -> Option<Minefield> {
    let exclude = safe_zone(size, start);

    for attempt in 1..=MAX_ATTEMPTS {
        if cancel.load(Ordering::Relaxed) {
            return None;
        }

        let layout = Minefield::generate(rng, size.width(), size.height(), size.mines(), &exclude);
        attempts.fetch_add(1, Ordering::Relaxed);

        if is_guessfree(&layout, start, solver) {
            debug!("Found guess-free layout after {attempt} attempts");
            return Some(layout);
        }
    }

    warn!("No guess-free {size} layout after {MAX_ATTEMPTS} attempts, using a random one");
    Some(Minefield::generate(
        rng,
        size.width(),
        size.height(),
        size.mines(),
        &exclude,
    ))
}

/// Runs [`generate_guessfree`] on a background thread so the UI can keep drawing.
pub struct ParallelGuessfreeGenerator {
    start: Point,
    attempts: Arc<AtomicU32>,
    found: Receiver<Minefield>,
    cancel: Arc<AtomicBool>,
}

impl ParallelGuessfreeGenerator {
    pub fn new(size: BoardSize, start: Point, solver: Arc<dyn Solver>) -> ParallelGuessfreeGenerator {
        let (tx, rx) = sync_channel(1);

        let attempts = Arc::new(AtomicU32::new(0));
        let cancel = Arc::new(AtomicBool::new(false));

        let generator = ParallelGuessfreeGenerator {
            start,
            attempts: attempts.clone(),
            found: rx,
            cancel: cancel.clone(),
        };

        info!(
            "Generating {size} board solvable by {} from {start}",
            solver.name()
        );

        let start = start.y * size.width() + start.x;

        thread::spawn(move || {
            let layout = generate_guessfree(
                &mut thread_rng(),
                size,
                start,
                &solver,
                &attempts,
                &cancel,
            );

            match layout {
                Some(layout) => {
                    let _ = tx.send(layout);
                }
                None => warn!(
                    "Generation cancelled after {} attempts",
                    attempts.load(Ordering::Relaxed)
                ),
            }
        });

        generator
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed) as usize
    }

    pub fn run(&mut self) -> GeneratorStatus {
        match self.found.try_recv() {
            Ok(layout) => GeneratorStatus::Found(layout),
            Err(TryRecvError::Empty) => GeneratorStatus::StillSolving,
            Err(TryRecvError::Disconnected) => GeneratorStatus::Stopped,
        }
    }
}

impl Drop for ParallelGuessfreeGenerator {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        game::ConventionalSize,
        minefield::CellKind,
        solver::{default_solver, find_solver},
    };
    use rand::{rngs::StdRng, SeedableRng};
    use std::time::{Duration, Instant};

    #[test]
    fn test_safe_zone_shrinks_when_crowded() {
        let roomy = BoardSize::new(5, 5, 10).unwrap();
        assert_eq!(safe_zone(roomy, 12).len(), 9);
        assert_eq!(safe_zone(roomy, 0).len(), 4);

        let crowded = BoardSize::new(3, 3, 5).unwrap();
        assert_eq!(safe_zone(crowded, 4), vec![4]);
    }

    #[test]
    fn test_generated_layout_is_guessfree() {
        let mut rng = StdRng::seed_from_u64(42);
        let size = ConventionalSize::Beginner.size();
        let solver = default_solver();
        let attempts = AtomicU32::new(0);

        let layout = generate_guessfree(
            &mut rng,
            size,
            40,
            &solver,
            &attempts,
            &AtomicBool::new(false),
        )
        .unwrap();

        assert!(attempts.load(Ordering::Relaxed) >= 1);
        assert_eq!(layout.mine_count(), 10);
        assert_eq!(layout.cells[40].kind, CellKind::Empty);
        assert!(layout
            .neighbors(4, 4)
            .all(|(x, y)| layout.cell(x, y).kind == CellKind::Empty));
        assert!(is_guessfree(&layout, 40, &solver));
    }

    #[test]
    fn test_dense_board_falls_back_to_random_layout() {
        let mut rng = StdRng::seed_from_u64(3);
        let size = BoardSize::new(3, 3, 7).unwrap();
        let attempts = AtomicU32::new(0);

        let layout = generate_guessfree(
            &mut rng,
            size,
            0,
            &default_solver(),
            &attempts,
            &AtomicBool::new(false),
        )
        .unwrap();

        assert_eq!(layout.mine_count(), 7);
        assert_eq!(layout.cells[0].kind, CellKind::Empty);
        assert!(attempts.load(Ordering::Relaxed) <= MAX_ATTEMPTS);
    }

    #[test]
    fn test_cancel_stops_generation() {
        let mut rng = StdRng::seed_from_u64(1);
        let layout = generate_guessfree(
            &mut rng,
            ConventionalSize::Expert.size(),
            0,
            &find_solver("Simple").unwrap(),
            &AtomicU32::new(0),
            &AtomicBool::new(true),
        );
        assert!(layout.is_none());
    }

    #[test]
    fn test_parallel_generator_finds_layout() {
        let size = BoardSize::new(8, 8, 6).unwrap();
        let mut generator = ParallelGuessfreeGenerator::new(size, Point::new(3, 3), default_solver());
        assert_eq!(generator.start(), Point::new(3, 3));

        let deadline = Instant::now() + Duration::from_secs(30);
        loop {
            match generator.run() {
                GeneratorStatus::Found(layout) => {
                    assert_eq!(layout.mine_count(), 6);
                    assert!(generator.attempts() >= 1);
                    break;
                }
                GeneratorStatus::StillSolving => {
                    assert!(Instant::now() < deadline, "generator took too long");
                    thread::sleep(Duration::from_millis(5));
                }
                GeneratorStatus::Stopped => panic!("generator stopped without a layout"),
            }
        }
    }
}
