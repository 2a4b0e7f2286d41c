use bitflags::bitflags;

bitflags! {
    /// Decode/encode option flags. Combine with `|`.
    ///
    /// Flip flags act identically on both sides: decoding and encoding with
    /// the same flags round-trips the pixel buffer.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TgaOptions: u8 {
        /// Decode color-mapped images to their palette indices and attach
        /// the palette to the image instead of resolving it.
        const RETURN_COLOR_MAP = 1 << 0;
        /// Reverse the row order of the pixel stream.
        const FLIP_VERTICALLY = 1 << 1;
        /// Reverse the column order of each row of the pixel stream.
        const FLIP_HORIZONTALLY = 1 << 2;
        /// Encode with run-length compression. Ignored by decode.
        const RLE = 1 << 3;
    }
}
