//! Excel report: one sheet of scored sentences, one of word counts.

use crate::output::{SentenceRecord, WordCount};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

pub const SENTIMENT_SHEET: &str = "Duygu Analizi";
pub const WORDS_SHEET: &str = "En Sık Geçen Kelimeler";

/// Build the workbook in memory and return the `.xlsx` bytes.
///
/// Always produces both sheets; with no data they hold the header row only.
pub fn build_workbook(sentences: &[SentenceRecord], words: &[WordCount]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SENTIMENT_SHEET)?;
    write_header(sheet, &["Page", "Sentence", "Score", "Label"], &bold)?;
    for (i, rec) in sentences.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_number(row, 0, rec.page as f64)?;
        sheet.write_string(row, 1, &rec.sentence)?;
        sheet.write_number(row, 2, rec.score)?;
        sheet.write_string(row, 3, rec.label.as_str())?;
    }
    sheet.set_column_width(1, 100)?;

    let sheet = workbook.add_worksheet();
    sheet.set_name(WORDS_SHEET)?;
    write_header(sheet, &["Word", "Count"], &bold)?;
    for (i, wc) in words.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, &wc.word)?;
        sheet.write_number(row, 1, wc.count as f64)?;
    }
    sheet.set_column_width(0, 24)?;

    workbook.save_to_buffer()
}

fn write_header(sheet: &mut Worksheet, titles: &[&str], format: &Format) -> Result<(), XlsxError> {
    for (col, title) in titles.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, format)?;
    }
    Ok(())
}
