//! End-to-end pipeline report: producer threads push orders through
//! the handoff queue, the matching thread drains it and records
//! per-command processing latency.

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use clap::Parser;
use hdrhistogram::Histogram;
use rust_decimal::Decimal;

use quickfill::{Command, Engine, HandoffQueue, Order, Side};

#[derive(Parser, Debug)]
#[command(name = "pipeline-report", about = "Queue + matching pipeline throughput report")]
struct Args {
    /// Orders pushed per producer
    #[arg(long, default_value_t = 100_000)]
    orders: u64,

    /// Number of producer threads
    #[arg(long, default_value_t = 1)]
    producers: u64,

    /// Pin the matching thread to the last CPU core
    #[arg(long, default_value_t = false)]
    pin: bool,
}

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let args = Args::parse();
    let queue: Arc<HandoffQueue<Command>> = Arc::new(HandoffQueue::new());

    println!(
        "Running pipeline: {} producer(s) x {} orders...",
        args.producers, args.orders
    );

    let started = Instant::now();

    let producers: Vec<_> = (0..args.producers)
        .map(|p| {
            let queue = Arc::clone(&queue);
            let orders = args.orders;
            thread::spawn(move || {
                for i in 0..orders {
                    // Alternate sides over a narrow band so roughly half
                    // the flow crosses
                    let side = if i % 2 == 0 { Side::Bid } else { Side::Ask };
                    let price = Decimal::new(10_000 + (i % 100) as i64, 2);
                    let order = Order::new(format!("{p}-{i}"), side, price, 10);
                    queue
                        .push(Command::Submit(order))
                        .expect("queue closed while producing");
                }
            })
        })
        .collect();

    let consumer = {
        let queue = Arc::clone(&queue);
        let pin = args.pin;
        thread::spawn(move || {
            let mut engine = Engine::with_capacity(100_000);
            if pin {
                engine.pin_to_core();
            }
            let mut histogram = Histogram::<u64>::new_with_bounds(1, 10_000_000, 3).unwrap();

            while let Some(cmd) = queue.pop() {
                let start = Instant::now();
                engine.process_command(cmd);
                histogram.record(start.elapsed().as_nanos() as u64).unwrap_or(());
            }

            (engine, histogram)
        })
    };

    for p in producers {
        p.join().unwrap();
    }
    queue.shutdown();

    let (engine, histogram) = consumer.join().unwrap();
    let elapsed = started.elapsed();
    let total_ops = args.producers * args.orders;

    println!("\n=== Pipeline Report ===");
    println!("Total Ops:  {}", total_ops);
    println!("Wall Time:  {:.3} s", elapsed.as_secs_f64());
    println!(
        "Throughput: {:.0} ops/sec",
        total_ops as f64 / elapsed.as_secs_f64()
    );
    println!("Trades:     {}", engine.trades().len());
    println!("Resting:    {}", engine.order_count());
    println!("--- match latency (ns) ---");
    println!("P50:    {:6}", histogram.value_at_quantile(0.50));
    println!("P90:    {:6}", histogram.value_at_quantile(0.90));
    println!("P99:    {:6}", histogram.value_at_quantile(0.99));
    println!("P99.9:  {:6}", histogram.value_at_quantile(0.999));
    println!("Max:    {:6}", histogram.max());

    let top = engine.top_of_book();
    match top.bid {
        Some(l) => println!("BID {}  Qty={}  Orders={}", l.price, l.total_qty, l.order_count),
        None => println!("BID <empty>"),
    }
    match top.ask {
        Some(l) => println!("ASK {}  Qty={}  Orders={}", l.price, l.total_qty, l.order_count),
        None => println!("ASK <empty>"),
    }
}
