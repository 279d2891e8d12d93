//! Command line front end for the curated sample datasets
//!
//! With no arguments this lists the available datasets; with an id it
//! downloads that dataset and prints the resulting DataFrame.

use std::env;
use std::process;

use samplesets::SampleData;

fn print_usage() {
    println!("Usage: sampledata [ID]");
    println!();
    println!("  (no arguments)  list the available sample datasets");
    println!("  ID              download dataset ID and print the DataFrame");
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() > 2 {
        print_usage();
        process::exit(2);
    }
    if let Some(arg) = args.get(1) {
        if arg == "-h" || arg == "--help" {
            print_usage();
            return;
        }
    }

    let sample_data = SampleData::new();
    match sample_data.sample_data(args.get(1).map(String::as_str)) {
        Ok(Some(df)) => println!("{}", df),
        Ok(None) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
