mod json;
mod parser;

use rencode::*;
use std::io::{self, Read, Write};
use anyhow::{Context, Result};
use structopt::StructOpt;
use std::str::from_utf8;

/// Decode and print rencode messages
#[derive(StructOpt)]
#[structopt(name = "rq", author = "Liv Fischer")]
struct Opt {
    /// parse a textual representation and encode it into a binary rencode message instead
    #[structopt(short, long)]
    encode: bool,
    /// use json instead of the textual representation
    #[structopt(short, long)]
    json: bool,
    /// decode byte strings as utf-8 text
    #[structopt(short, long)]
    utf8: bool,
    /// require every float to have this width when encoding, 32 or 64
    #[structopt(short, long)]
    float_bits: Option<u32>,
    /// maximum nesting of lists and dicts when decoding
    #[structopt(long, default_value = "512")]
    max_depth: usize,
    /// print null for undecodable input instead of failing
    #[structopt(long)]
    lossy: bool,
}

fn main() -> Result<()> {
    let opt = Opt::from_args();
    let mut buffer = Vec::new();
    io::stdin().read_to_end(&mut buffer).context("Failed to read stdin")?;
    if opt.encode {
        let bytes = if opt.json { encode_json(&buffer, &opt)? } else { encode(&buffer, &opt)? };
        io::stdout().write_all(&bytes).context("Failed to write stdout")
    } else if opt.json {
        print_json(&buffer, &opt)
    } else {
        print(&buffer, &opt)
    }
}

fn decode_options(opt: &Opt) -> DecodeOptions {
    DecodeOptions { decode_utf8: opt.utf8, max_depth: opt.max_depth }
}

fn decode_input<'a>(buffer: &'a [u8], options: &DecodeOptions, opt: &Opt) -> Result<Value<'a>> {
    if opt.lossy {
        Ok(Decoder::decode_lossy(buffer, options))
    } else {
        Ok(Decoder::decode_all(buffer, options).context("Decoding error")?)
    }
}

fn print(buffer: &[u8], opt: &Opt) -> Result<()> {
    let value = decode_input(buffer, &decode_options(opt), opt)?;
    println!("{}", &value);
    Ok(())
}

fn print_json(buffer: &[u8], opt: &Opt) -> Result<()> {
    let options = DecodeOptions { decode_utf8: true, ..decode_options(opt) };
    let value = decode_input(buffer, &options, opt)?;
    println!("{}", serde_json::to_string_pretty(&json::to_json(&value))?);
    Ok(())
}

fn encode(buffer: &[u8], opt: &Opt) -> Result<Vec<u8>> {
    let string = from_utf8(buffer).context("input is not utf-8")?;
    let value = parser::parse(string)?;
    let options = EncodeOptions { float_bits: opt.float_bits.map(FloatBits::try_from).transpose()? };
    let mut bytes = Vec::new();
    Encoder::encode_with(&value, &mut bytes, &options).context("Encoding error")?;
    Ok(bytes)
}

fn encode_json(buffer: &[u8], opt: &Opt) -> Result<Vec<u8>> {
    let value: serde_json::Value = serde_json::from_slice(buffer).context("input is not json")?;
    let float_bits = opt.float_bits.map(FloatBits::try_from).transpose()?.unwrap_or_default();
    Ok(rencode_serde::to_bytes_with(&value, float_bits).context("Encoding error")?)
}
