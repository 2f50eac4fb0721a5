use std::fs::File;
use std::io::BufWriter;

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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// Cities encoded as Latin-1, so the loader has to fall back from UTF-8.
const CITIES: &[&[u8]] = &[b"Berlin", b"Z\xfcrich", b"M\xfcnchen", b"Oslo", b"Malm\xf6"];
const PRODUCTS: &[&str] = &["widget", "gadget", "gizmo, deluxe", "sprocket"];

fn main() {
    let mut rng = SimpleRng::new(42);
    let rows: usize = std::env::args()
        .nth(1)
        .map(|arg| arg.parse().expect("row count must be a number"))
        .unwrap_or(25_000);

    let output_path = "sample_data.csv";
    let file = File::create(output_path).expect("Failed to create output file");
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(BufWriter::new(file));

    writer
        .write_record(["id", "city", "product", "quantity", "price", "comment"])
        .expect("Failed to write header");

    let mut malformed = 0;
    for id in 0..rows {
        let quantity = (rng.next_u64() % 100).to_string();
        let price = format!("{:.2}", 1.0 + rng.next_f64() * 99.0);
        // Roughly 10% of comments are left empty.
        let comment = if rng.next_f64() < 0.1 {
            String::new()
        } else {
            format!("order {id}")
        };

        let mut record: Vec<Vec<u8>> = vec![
            id.to_string().into_bytes(),
            rng.pick(CITIES).to_vec(),
            rng.pick(PRODUCTS).as_bytes().to_vec(),
            quantity.into_bytes(),
            price.into_bytes(),
            comment.into_bytes(),
        ];
        // Every thousandth row gets a stray field and will be skipped on load.
        if id % 1000 == 999 {
            record.push(b"stray".to_vec());
            malformed += 1;
        }
        writer.write_record(&record).expect("Failed to write row");
    }

    writer.flush().expect("Failed to flush output file");

    println!("Wrote {rows} rows ({malformed} malformed) to {output_path}");
}
