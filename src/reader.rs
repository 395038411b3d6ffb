use crate::error::MarketError;
use crate::vegetable::VegetablePrice;
use std::io::Read;

/// Streams vegetable prices out of CSV with an `id,name,price_per_kg` header.
pub struct PriceReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> PriceReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn prices(self) -> impl Iterator<Item = Result<VegetablePrice, MarketError>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(MarketError::from))
    }
}
