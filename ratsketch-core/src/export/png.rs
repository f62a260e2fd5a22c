//! PNG encoding of rendered bitmaps.

/// Encode an RGBA8 bitmap as an 8-bit RGBA PNG.
pub fn encode(image: &image::RgbaImage) -> Result<Vec<u8>, ::png::EncodingError> {
    let (width, height) = image.dimensions();
    // Compressed output is usually far smaller than raw, start small.
    let mut bytes = Vec::with_capacity(image.as_raw().len() / 8);
    {
        let mut encoder = ::png::Encoder::new(&mut bytes, width, height);
        encoder.set_color(::png::ColorType::Rgba);
        encoder.set_depth(::png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(image.as_raw())?;
        writer.finish()?;
    }
    Ok(bytes)
}

/// Raw standard-alphabet base64, no `data:image/png;base64,` prefix.
#[must_use]
pub fn to_base64(bytes: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Decode a PNG back into an RGBA8 bitmap. Only 8-bit RGBA input is accepted, which is all
/// [`encode`] produces.
#[cfg(test)]
pub(crate) fn decode(bytes: &[u8]) -> Result<image::RgbaImage, DecodeError> {
    let decoder = ::png::Decoder::new(bytes);
    let mut reader = decoder.read_info()?;
    let mut buffer = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buffer)?;
    if info.color_type != ::png::ColorType::Rgba || info.bit_depth != ::png::BitDepth::Eight {
        return Err(DecodeError::Format);
    }
    buffer.truncate(info.buffer_size());
    image::RgbaImage::from_raw(info.width, info.height, buffer).ok_or(DecodeError::Format)
}

#[cfg(test)]
#[derive(thiserror::Error, Debug)]
pub(crate) enum DecodeError {
    #[error(transparent)]
    Png(#[from] ::png::DecodingError),
    #[error("not an 8-bit RGBA png")]
    Format,
}
