// Copyright (c) 2026 rezky_nightky

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::sky::Particle;

/// How often the drift thread re-checks the stop flag while waiting out
/// an interval, so cancellation lands promptly even with slow ticks.
const STOP_POLL: Duration = Duration::from_millis(5);

/// Owns the background drift task. `stop` is idempotent and also runs
/// on drop, so the timer cannot outlive the scope that started it.
pub struct DriftHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl DriftHandle {
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(t) = self.thread.take() {
            let _ = t.join();
        }
    }
}

impl Drop for DriftHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Start advancing `population` every `interval`, publishing a fresh
/// snapshot of the whole population after each tick. The scheduler owns
/// the working copy; observers only ever see the published clones.
pub fn start(
    population: Vec<Particle>,
    interval: Duration,
) -> io::Result<(DriftHandle, Receiver<Vec<Particle>>)> {
    let stop = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel();

    let flag = Arc::clone(&stop);
    let thread = thread::Builder::new()
        .name("drift".to_string())
        .spawn(move || run(population, interval, flag, tx))?;

    Ok((
        DriftHandle {
            stop,
            thread: Some(thread),
        },
        rx,
    ))
}

fn run(
    mut population: Vec<Particle>,
    interval: Duration,
    stop: Arc<AtomicBool>,
    tx: Sender<Vec<Particle>>,
) {
    let mut next_tick = Instant::now() + interval;

    loop {
        loop {
            if stop.load(Ordering::Relaxed) {
                return;
            }
            let now = Instant::now();
            if now >= next_tick {
                break;
            }
            thread::sleep((next_tick - now).min(STOP_POLL));
        }
        if stop.load(Ordering::Relaxed) {
            return;
        }

        for p in &mut population {
            p.step();
        }
        if tx.send(population.clone()).is_err() {
            // Observer went away; nothing left to animate for.
            return;
        }

        // Cadence anchors to scheduling time. When a tick ran long the
        // schedule resets instead of bursting to catch up, so a stall
        // shows as one larger jump.
        next_tick += interval;
        let now = Instant::now();
        if now > next_tick {
            next_tick = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::TryRecvError;

    use super::*;
    use crate::sky::{Kind, RESPAWN_Y};

    fn one_leaf(y: f32, speed: f32) -> Vec<Particle> {
        vec![Particle {
            id: 0,
            x: 25.0,
            y,
            size: 10.0,
            speed,
            kind: Kind::Leaf,
            rotation: 0.0,
            rotation_speed: 0.5,
        }]
    }

    #[test]
    fn publishes_one_snapshot_per_tick() {
        let (mut handle, rx) = start(one_leaf(0.0, 0.5), Duration::from_millis(2)).unwrap();

        let first = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        let second = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        handle.stop();

        assert_eq!(first.len(), 1);
        assert_eq!(first[0].y, 0.5);
        assert_eq!(second[0].y, 1.0);
        assert_eq!(second[0].x, 25.0);
    }

    #[test]
    fn stop_halts_publication() {
        let (mut handle, rx) = start(one_leaf(0.0, 0.5), Duration::from_millis(2)).unwrap();
        let _ = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        handle.stop();

        // stop() joins the thread, so after the queued snapshots drain
        // the channel must read disconnected: nothing ticks past stop.
        loop {
            match rx.try_recv() {
                Ok(_) => continue,
                Err(e) => {
                    assert_eq!(e, TryRecvError::Disconnected);
                    break;
                }
            }
        }
    }

    #[test]
    fn stop_is_idempotent() {
        let (mut handle, rx) = start(one_leaf(0.0, 0.5), Duration::from_millis(2)).unwrap();
        handle.stop();
        handle.stop();
        drop(rx);
    }

    #[test]
    fn dropping_the_handle_stops_the_task() {
        let (handle, rx) = start(one_leaf(0.0, 0.5), Duration::from_millis(2)).unwrap();
        drop(handle);

        // Drop joins the thread; whatever was in flight beforehand is
        // fine, the channel closing is the teardown guarantee.
        loop {
            match rx.try_recv() {
                Ok(_) => continue,
                Err(e) => {
                    assert_eq!(e, TryRecvError::Disconnected);
                    break;
                }
            }
        }
    }

    #[test]
    fn recycles_through_the_floor_while_running() {
        let (mut handle, rx) = start(one_leaf(108.5, 1.0), Duration::from_millis(2)).unwrap();
        let first = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        let second = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        handle.stop();

        assert_eq!(first[0].y, 109.5);
        assert_eq!(second[0].y, RESPAWN_Y);
    }
}
