use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

/// A scheduled day for one driver, weighted towards real routes.
fn assignment(rng: &mut SimpleRng) -> Option<String> {
    match rng.below(10) {
        0 | 1 => None,
        2 => Some("DSP Initiated Work - Rescue".to_string()),
        3 => Some(format!("{}", 10 + rng.below(90))),
        4 => Some(["Training", "Sweeper", "Standby"][rng.below(3)].to_string()),
        _ => Some(format!("CX{}", 1 + rng.below(40))),
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let drivers = [
        "Avery", "Blake", "Casey", "Devon", "Emery", "Finley", "Harper", "Jordan", "Kai", "Logan",
        "Morgan", "Quinn",
    ];
    let days = 7;

    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("mmm d, yyyy");
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();

    // Row 1: company and station; row 3: one date per column from column 2.
    sheet
        .write_string_with_format(0, 0, "Weekly schedule", &bold)
        .expect("Failed to write title");
    sheet.write_string(1, 0, "Company / Station").expect("Failed to write cell");
    sheet.write_string(1, 1, "Sample Logistics LLC").expect("Failed to write cell");
    sheet.write_string(1, 2, "DXX1").expect("Failed to write cell");
    sheet.write_string(3, 0, "Driver").expect("Failed to write cell");
    sheet.write_string(3, 1, "Transporter ID").expect("Failed to write cell");

    for day in 0..days {
        let date = ExcelDateTime::from_ymd(2024, 1, 1 + day as u8).expect("Invalid date");
        sheet
            .write_datetime_with_format(3, 2 + day as u16, &date, &date_format)
            .expect("Failed to write date");
    }

    let mut scheduled = 0;
    for (i, driver) in drivers.iter().enumerate() {
        let row = 4 + i as u32;
        sheet.write_string(row, 0, *driver).expect("Failed to write cell");
        sheet
            .write_string(row, 1, format!("A{:06}", 100_000 + i * 37))
            .expect("Failed to write cell");
        for day in 0..days {
            if let Some(value) = assignment(&mut rng) {
                sheet
                    .write_string(row, 2 + day as u16, value)
                    .expect("Failed to write cell");
                scheduled += 1;
            }
        }
    }

    let output_path = "sample_schedule.xlsx";
    workbook.save(output_path).expect("Failed to write workbook");

    println!(
        "Wrote {} drivers over {days} days ({scheduled} scheduled cells) to {output_path}",
        drivers.len()
    );
}
