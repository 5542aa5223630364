use age::armor::ArmoredWriter;
use age::stream::StreamWriter;
use std::io::{Error, Write};

pub trait Finish<O> {
    fn finish(self) -> Result<O, Error>;
}

impl<W: Write> Finish<W> for StreamWriter<W> {
    fn finish(self) -> Result<W, Error> {
        self.finish()
    }
}

impl<W: Write> Finish<W> for ArmoredWriter<W> {
    fn finish(self) -> Result<W, Error> {
        self.finish()
    }
}
