use colored::Colorize;
use std::error::Error;
use weave_space::config::Config;
use weave_space::output::{owned_ranges_json, print_space};
use weave_space::space::Space;
use weave_space::Range;

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    let config = Config::from_env()?;
    log4rs::init_file(&config.log_config, Default::default())?;
    log::info!("#Start main() with {} range(s)", config.ranges.len());

    let mut space = Space::new();
    space.add_ranges(&config.ranges);
    print_space(&space);

    let owned = space.owned_ranges();
    for r in &owned {
        let cidrs: Vec<String> = r.cidrs().iter().map(|c| c.to_string()).collect();
        println!("{} {}", r.to_string().on_blue(), cidrs.join(","));
    }

    let whole = match (owned.first(), owned.last()) {
        (Some(first), Some(last)) => Range {
            start: first.start,
            end: last.end,
        },
        _ => Range::default(),
    };
    match space.donate(whole, config.cidr_aligned, &config.cidrs()) {
        Some(donated) => println!("{} {}", "donated".green(), donated.as_cidr_string()),
        None => println!("{}", "nothing to donate".red()),
    }
    print_space(&space);

    println!("{}", owned_ranges_json(&space)?);
    Ok(())
}
