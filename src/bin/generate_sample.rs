use std::path::PathBuf;

use anyhow::{Context, Result};

const FIRST_NAMES: &[&str] = &[
    "Owen", "John", "Laina", "Lily", "William", "James", "Elizabeth", "Karl", "Anna", "Thomas",
];
const SURNAMES: &[&str] = &[
    "Braund", "Cumings", "Heikkinen", "Futrelle", "Allen", "Moran", "McCarthy", "Palsson",
    "Johnson", "Nasser",
];
const CABIN_DECKS: &[char] = &['A', 'B', 'C', 'D', 'E', 'F', 'G'];
const EMBARKED: &[&str] = &["S", "C", "Q"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    let rows: usize = std::env::args()
        .nth(1)
        .map(|n| n.parse::<usize>())
        .transpose()
        .context("row count must be a whole number")?
        .unwrap_or(891);
    let output_path = PathBuf::from("sample_passengers.csv");

    let mut rng = SimpleRng::new(42);
    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;
    writer.write_record([
        "PassengerId", "Survived", "Pclass", "Name", "Sex", "Age", "SibSp", "Fare", "Cabin",
        "Embarked",
    ])?;

    for id in 1..=rows {
        let pclass = 1 + (rng.next_u64() % 3);
        let female = rng.chance(0.35);
        let married = female && rng.chance(0.45);
        let title = match (female, married) {
            (true, true) => "Mrs",
            (true, false) => "Miss",
            _ => "Mr",
        };
        let name = format!("{}, {title}. {}", rng.pick(SURNAMES), rng.pick(FIRST_NAMES));

        // Survival odds follow class and sex.
        let odds = match (pclass, female) {
            (1, true) => 0.95,
            (2, true) => 0.9,
            (3, true) => 0.5,
            (1, false) => 0.37,
            _ => 0.15,
        };
        let survived = u8::from(rng.chance(odds));

        let age = if rng.chance(0.2) {
            String::new()
        } else {
            format!("{:.0}", rng.gauss(30.0, 14.0).clamp(0.42, 80.0))
        };
        let fare = rng.gauss(35.0 / pclass as f64, 8.0).max(0.0);
        let cabin = if pclass == 1 || rng.chance(0.1) {
            format!("{}{}", rng.pick(CABIN_DECKS), 1 + rng.next_u64() % 120)
        } else {
            String::new()
        };

        writer.write_record([
            id.to_string(),
            survived.to_string(),
            pclass.to_string(),
            name,
            if female { "female" } else { "male" }.to_string(),
            age,
            (rng.next_u64() % 3).to_string(),
            format!("{fare:.4}"),
            cabin,
            rng.pick(EMBARKED).to_string(),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {rows} passengers to {}", output_path.display());
    Ok(())
}
