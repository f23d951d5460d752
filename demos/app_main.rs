//! Hosted run of the inspection fixture
//!
//! A ticker thread stands in for SysTick. After a few seconds of kernel
//! time the run loop is told to stop and every object is dumped the way an
//! inspector would see it.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{info, LevelFilter, Log, Metadata, Record};
use rtos_fixture::{
    app_main, ms_to_ticks, FixtureConfig, Kernel, KernelObject, ShutdownSignal, TickSource,
    CFG_TICK_RATE_HZ,
};

struct StdoutLogger;

impl Log for StdoutLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        println!("[{:<5}] {}", record.level(), record.args());
    }

    fn flush(&self) {}
}

static LOGGER: StdoutLogger = StdoutLogger;

// Long enough for TIMER4 to reach its last expiry
const RUN_TIME_MS: u32 = 5_500;

fn main() {
    let _ = log::set_logger(&LOGGER).map(|()| log::set_max_level(LevelFilter::Debug));

    let ticks = Arc::new(TickSource::new());
    let shutdown = Arc::new(ShutdownSignal::new());

    let mut kernel = Kernel::new();
    let ctx = app_main(&mut kernel, FixtureConfig::default());
    info!("fixture ready: {} tasks, {} registered objects", kernel.task_count(), kernel.registry().len());

    let ticker = {
        let ticks = Arc::clone(&ticks);
        let shutdown = Arc::clone(&shutdown);
        thread::spawn(move || {
            let period = Duration::from_micros(1_000_000 / u64::from(CFG_TICK_RATE_HZ));
            let stop_at = ms_to_ticks(RUN_TIME_MS);
            while ticks.now() < stop_at {
                thread::sleep(period);
                ticks.tick();
            }
            shutdown.request();
        })
    };

    kernel.run(&ctx, &ticks, &shutdown);
    let _ = ticker.join();

    info!("stopped at tick {}", kernel.tick_get());

    for task in kernel.tasks() {
        info!(
            "task {:<10} #{} prio {} state {:?} passes {}",
            task.name, task.number, task.prio, task.state, task.run_ctr
        );
    }

    for entry in kernel.objects() {
        match entry.object {
            KernelObject::Queue(q) => {
                if let Ok(qi) = kernel.queue_info(q) {
                    info!("{:<16} queue {}/{} items {:?}", entry.name, qi.messages_waiting, qi.length, qi.items);
                }
            }
            KernelObject::Semaphore(s) => {
                if let Ok(si) = kernel.sem_info(s) {
                    info!(
                        "{:<16} {:?} count {} holder {:?} recursion {}",
                        entry.name, si.kind, si.count, si.holder, si.recursive_count
                    );
                }
            }
            KernelObject::Timer(t) => {
                if let Ok(ti) = kernel.timer_info(t) {
                    info!(
                        "{:<16} period {} active {} tag {}",
                        entry.name, ti.period, ti.active, ti.tag
                    );
                }
            }
        }
    }
}
