//! Test data builders for creating waveform dumps

/// Builder for dump text in the simulator's tabular format
pub struct DumpBuilder {
    preamble: Vec<String>,
    columns: Vec<(usize, String)>,
    rows: Vec<String>,
    separator: bool,
}

impl DumpBuilder {
    /// Start a dump with `time` declared as column 0
    pub fn new() -> Self {
        Self {
            preamble: Vec::new(),
            columns: vec![(0, "time".to_string())],
            rows: Vec::new(),
            separator: true,
        }
    }

    /// Free text before the column declarations
    pub fn preamble(mut self, line: &str) -> Self {
        self.preamble.push(line.to_string());
        self
    }

    /// Declare the next column
    pub fn column(mut self, name: &str) -> Self {
        let position = self.columns.len();
        self.columns.push((position, name.to_string()));
        self
    }

    /// Declare a column at an explicit position
    pub fn column_at(mut self, position: usize, name: &str) -> Self {
        self.columns.push((position, name.to_string()));
        self
    }

    /// Omit the `=====` line
    pub fn without_separator(mut self) -> Self {
        self.separator = false;
        self
    }

    /// Add a row: the time value followed by raw tokens
    pub fn row(mut self, time: i64, tokens: &[&str]) -> Self {
        let mut line = time.to_string();
        for token in tokens {
            line.push(' ');
            line.push_str(token);
        }
        self.rows.push(line);
        self
    }

    /// Add a raw data line as-is
    pub fn raw_row(mut self, line: &str) -> Self {
        self.rows.push(line.to_string());
        self
    }

    pub fn build(self) -> String {
        let mut out = String::new();
        for line in &self.preamble {
            out.push_str(line);
            out.push('\n');
        }
        for (position, name) in &self.columns {
            out.push_str(&format!("{} {}\n", position, name));
        }
        if self.separator {
            out.push_str("=====\n");
        }
        for row in &self.rows {
            out.push_str(row);
            out.push('\n');
        }
        out
    }

    /// A counter testbench: clk, rst, en and an 8-bit count over `cycles` rows
    ///
    /// Reset is held for the first two rows; count increments on every row
    /// where enable is high.
    pub fn counter(cycles: usize) -> String {
        let mut builder = Self::new()
            .preamble("VCD info: dumpfile counter.vcd opened for output.")
            .column("clk")
            .column("rst")
            .column("en")
            .column("count");
        let mut count: u8 = 0;
        for cycle in 0..cycles {
            let rst = cycle < 2;
            let en = !rst && cycle % 4 != 3;
            if rst {
                count = 0;
            } else if en {
                count = count.wrapping_add(1);
            }
            builder = builder.row(
                (cycle * 10) as i64,
                &[
                    "1",
                    if rst { "1" } else { "0" },
                    if en { "1" } else { "0" },
                    &format!("{:02x}", count),
                ],
            );
        }
        builder.build()
    }
}

impl Default for DumpBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_builder() {
        let dump = DumpBuilder::new()
            .column("clk")
            .row(0, &["1"])
            .build();
        assert_eq!(dump, "0 time\n1 clk\n=====\n0 1\n");
    }
}
