use clap::Parser;
use tri_hash::HashTable;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "count", default_value_t = 1000)]
    count: usize,

    #[arg(short = 'i', long = "initial_capacity", default_value_t = 256)]
    initial_capacity: usize,
}

fn main() {
    let args = Args::parse();

    println!(
        "Creating HashTable with initial capacity: {}",
        args.initial_capacity
    );

    let mut table: HashTable<u64> = HashTable::with_initial_capacity(args.initial_capacity);

    println!("Filling table with {} string keys...", args.count);
    for i in 0..args.count {
        let key = format!("key_{i:016X}");
        table.insert(key.as_bytes(), i as u64);
    }

    println!(
        "Inserted {} keys into {} buckets",
        table.len(),
        table.capacity()
    );
    println!("Final load factor: {:.2}%", table.load_factor() * 100.0);

    table.probe_stats().print();
}
