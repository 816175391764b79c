use serde::Serialize;

/// Summary of one finished conversion, printable as text or JSON.
#[derive(Debug, Serialize)]
pub struct ConversionReport {
    pub input: String,
    pub output: String,
    pub source_width: u32,
    pub source_height: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub filled_cells: u64,
    pub distinct_colors: usize,
    pub output_bytes: u64,
    pub duration_ms: u128,
}

impl ConversionReport {
    pub fn print_text(&self) {
        println!("Converted {} -> {}", self.input, self.output);
        println!(
            "  source: {}x{} px, canvas: {}x{} px",
            self.source_width, self.source_height, self.canvas_width, self.canvas_height
        );
        println!(
            "  cells: {} filled, {} distinct colors",
            self.filled_cells, self.distinct_colors
        );
        println!(
            "  wrote {} bytes in {} ms",
            self.output_bytes, self.duration_ms
        );
    }
}
