//! Checks a small crop of apples and prints every failure.
//!
//! ```text
//! RUST_LOG=chaincheck=trace cargo run -p chaincheck --example orchard
//! ```

use chaincheck::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Checkable)]
struct Apple {
    #[check(not_null)]
    weight: Option<u32>,

    #[check(regex(pattern = r"[A-Z][a-z]+( [A-Z][a-z]+)*"))]
    variety: String,

    #[check(not_blank(reason = "every apple needs a colour, {fieldName} was empty"))]
    color: String,

    #[check(size(left = 1, right = 4))]
    tags: Vec<&'static str>,

    #[check(number_between(left_string = "0.10", right_string = "4.99"))]
    price: f64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let crop = [
        Apple {
            weight: Some(182),
            variety: "Granny Smith".into(),
            color: "green".into(),
            tags: vec!["tart"],
            price: 0.89,
        },
        Apple {
            weight: None,
            variety: "honeycrisp".into(),
            color: " ".into(),
            tags: Vec::new(),
            price: 7.5,
        },
    ];

    let config = CheckConfig::default();
    for apple in &crop {
        let mut chain = CheckChain::new().fail_fast(false);
        if let Err(err) = CheckFactory::with_config(&config)
            .target(apple)
            .create(&mut chain)
        {
            eprintln!("{}: configuration problem: {err}", apple.variety);
            continue;
        }

        match chain.finish() {
            Ok(()) => println!("{}: ok", apple.variety),
            Err(failures) => {
                println!("{}: {} failure(s)", apple.variety, failures.len());
                for message in failures.messages() {
                    println!("  - {message}");
                }
            }
        }
    }
}
