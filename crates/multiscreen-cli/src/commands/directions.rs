use anyhow::Result;

use multiscreen_core::command::Sign;
use multiscreen_core::Direction;

pub fn run() -> Result<()> {
    println!("{:<16} {:<11} {:<11} fade", "command", "horizontal", "vertical");

    for direction in Direction::ALL {
        let motion = direction.motion();
        println!(
            "{:<16} {:<11} {:<11} {}",
            direction.as_str(),
            edge(motion.dx, "left", "right"),
            edge(motion.dy, "top", "bottom"),
            if motion.fade { "yes" } else { "no" }
        );
    }

    Ok(())
}

fn edge(sign: Sign, negative: &'static str, positive: &'static str) -> &'static str {
    match sign {
        Sign::Negative => negative,
        Sign::Zero => "-",
        Sign::Positive => positive,
    }
}
