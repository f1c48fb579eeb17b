//! Generate testdata command implementation.
//!
//! Generates a synthetic thread snapshot in the worker's JSON format.

use chrono::Utc;
use herakles_thread_inspector::{StackFrame, ThreadRecord, ThreadState};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const POOL_NAMES: [&str; 8] = [
    "http-worker",
    "exchange-client",
    "task-notification",
    "node-scheduler",
    "page-buffer-client-callback",
    "query-execution",
    "split-runner",
    "hive-metastore",
];

const SINGLETON_NAMES: [&str; 8] = [
    "main",
    "Finalizer",
    "Reference Handler",
    "Signal Dispatcher",
    "Common-Cleaner",
    "Attach Listener",
    "gc-thread",
    "DestroyJavaVM",
];

const FRAMES: [(&str, &str, &str); 6] = [
    ("java.lang.Object", "wait", "Object.java"),
    ("java.lang.Thread", "sleep", "Thread.java"),
    ("sun.misc.Unsafe", "park", "Unsafe.java"),
    ("java.util.concurrent.ThreadPoolExecutor", "runWorker", "ThreadPoolExecutor.java"),
    ("com.facebook.presto.operator.Driver", "processInternal", "Driver.java"),
    ("java.net.SocketInputStream", "socketRead0", "SocketInputStream.java"),
];

/// Shape of the generated snapshot.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotShape {
    pub query_threads: usize,
    pub pools: usize,
    pub pool_size: usize,
    pub singletons: usize,
}

fn random_state<R: Rng>(rng: &mut R) -> ThreadState {
    *ThreadState::ALL[..4]
        .choose(rng)
        .unwrap_or(&ThreadState::Runnable)
}

fn random_stack<R: Rng>(rng: &mut R) -> Vec<StackFrame> {
    let depth = rng.gen_range(1..=FRAMES.len());
    FRAMES
        .choose_multiple(rng, depth)
        .map(|(class_name, method, file)| StackFrame {
            class_name: class_name.to_string(),
            method: method.to_string(),
            file: file.to_string(),
            line: rng.gen_range(1..2000),
        })
        .collect()
}

/// Builds a synthetic snapshot; threads are shuffled so groups interleave.
pub fn generate_threads<R: Rng>(rng: &mut R, shape: SnapshotShape) -> Vec<ThreadRecord> {
    let mut names = Vec::new();

    let query_id = format!(
        "{}_{:05}_{}",
        Utc::now().format("%Y%m%d_%H%M%S"),
        rng.gen_range(0..100_000),
        "x7k2m"
    );
    for i in 0..shape.query_threads {
        names.push(format!(
            "{}.{}.{}-{}-{}",
            query_id,
            i % 3,
            i % 4,
            rng.gen_range(0..8),
            rng.gen_range(0..10_000)
        ));
    }

    for pool in POOL_NAMES.iter().cycle().take(shape.pools) {
        for instance in 0..shape.pool_size {
            names.push(format!("{pool}-{instance}"));
        }
    }

    for name in SINGLETON_NAMES.iter().cycle().take(shape.singletons) {
        names.push(name.to_string());
    }

    names.shuffle(rng);

    names
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let state = random_state(rng);
            let lock_owner_id = match state {
                ThreadState::Blocked => Some(rng.gen_range(1..=i as i64 + 1)),
                _ => None,
            };
            ThreadRecord {
                id: i as i64 + 1,
                name,
                state,
                lock_owner_id,
                stack_trace: random_stack(rng),
            }
        })
        .collect()
}

/// Writes a synthetic snapshot JSON file.
pub fn command_generate_testdata(
    output: PathBuf,
    shape: SnapshotShape,
) -> Result<(), Box<dyn std::error::Error>> {
    debug!("Generating test snapshot {:?} into {}", shape, output.display());

    let mut rng = rand::thread_rng();
    let threads = generate_threads(&mut rng, shape);

    fs::write(&output, serde_json::to_string_pretty(&threads)?)?;
    println!(
        "✅ Wrote {} threads to {}",
        threads.len(),
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use herakles_thread_inspector::group_threads;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_snapshot_groups_as_expected() {
        let mut rng = StdRng::seed_from_u64(7);
        let shape = SnapshotShape {
            query_threads: 5,
            pools: 3,
            pool_size: 4,
            singletons: 2,
        };

        let grouped = group_threads(generate_threads(&mut rng, shape));

        assert_eq!(grouped.all_threads().len(), 5 + 3 * 4 + 2);
        assert_eq!(grouped.running_queries().len(), 5);
        assert_eq!(grouped.get("http-worker").map(|t| t.len()), Some(4));
        assert_eq!(grouped.get("split-runner"), None);
        assert_eq!(grouped.get("main").map(|t| t.len()), Some(1));
        // two reserved groups, three pools, two singletons
        assert_eq!(grouped.group_count(), 7);
    }
}
