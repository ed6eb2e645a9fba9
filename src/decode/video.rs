//! Video demux and decode via FFmpeg.
//!
//! Opens the container, locates the first real video elementary stream
//! (attached pictures and audio streams are ignored), and decodes frames on
//! demand for the frame selector instead of always taking frame zero. Each
//! decoded frame is converted to RGBA by a per-call swscale context at the
//! source dimensions — the stride FFmpeg hands back can exceed the pixel row
//! width for block-aligned codecs, which [`RawFrame`] preserves.
//!
//! A container that opens but yields no decodable frame is a hard error, not
//! a blank thumbnail. A container with no video stream at all (audio-only
//! OGG) is the soft no-content outcome. Read errors after the first decoded
//! frame are ignored so a truncated tail does not discard a usable stream.

use std::path::Path;

use ffmpeg_next as ffmpeg;
use ffmpeg::format::Pixel;
use ffmpeg::format::stream::Disposition;
use ffmpeg::media;
use ffmpeg::software::scaling;
use ffmpeg::{codec, decoder, frame};

use super::{BackendOutput, DecodeBackend, codec_label, ffmpeg_setup, open_input};
use crate::error::ThumbError;
use crate::select;
use crate::sniff::FileKind;
use crate::types::{Family, Orientation, RawFrame, SourceMeta};

pub(crate) struct VideoBackend;

impl DecodeBackend for VideoBackend {
    fn decode(&self, path: &Path, kind: FileKind) -> Result<BackendOutput, ThumbError> {
        ffmpeg_setup();
        let mut ictx = open_input(path, kind)?;

        let has_audio = ictx.streams().best(media::Type::Audio).is_some();

        let Some((stream_index, codec_id, parameters)) = ictx
            .streams()
            .best(media::Type::Video)
            .filter(|stream| !stream.disposition().contains(Disposition::ATTACHED_PIC))
            .map(|stream| (stream.index(), stream.parameters().id(), stream.parameters()))
        else {
            // Recognized container, nothing visual inside (audio-only OGG).
            return Ok(BackendOutput::NoContent(SourceMeta {
                family: Family::Video,
                container: kind.name().to_string(),
                width: 0,
                height: 0,
                has_video: false,
                has_audio,
                orientation: Orientation::Identity,
            }));
        };

        let container = format!("{}/{}", kind.name(), codec_label(codec_id));
        let decoder = codec::context::Context::from_parameters(parameters)
            .and_then(|ctx| ctx.decoder().video())
            .map_err(|err| ThumbError::Corrupt(format!("{container}: {err}")))?;

        let frames = FrameStream {
            ictx: &mut ictx,
            decoder,
            stream_index,
            container: &container,
            scaler: None,
            decoded: frame::Video::empty(),
            rgba: frame::Video::empty(),
            decoded_count: 0,
            eof_sent: false,
        };

        let Some(chosen) = select::select_frame(frames)? else {
            return Err(ThumbError::Corrupt(format!(
                "{container}: no decodable video frames"
            )));
        };

        let meta = SourceMeta {
            family: Family::Video,
            container,
            width: chosen.width,
            height: chosen.height,
            has_video: true,
            has_audio,
            orientation: Orientation::Identity,
        };
        Ok(BackendOutput::Frame(meta, chosen))
    }
}

/// Lazily decoded RGBA frames from one video stream, in presentation order.
///
/// Yields every [`select::PROBE_INTERVAL`]-th decoded frame so the
/// selector's lookahead window spans a longer stretch of the stream.
struct FrameStream<'a> {
    ictx: &'a mut ffmpeg::format::context::Input,
    decoder: decoder::Video,
    stream_index: usize,
    container: &'a str,
    scaler: Option<scaling::Context>,
    decoded: frame::Video,
    rgba: frame::Video,
    decoded_count: usize,
    eof_sent: bool,
}

impl FrameStream<'_> {
    /// Convert the current decoded frame to RGBA at source dimensions.
    fn to_rgba(&mut self) -> Result<RawFrame, ThumbError> {
        let mut scaler = match self.scaler.take() {
            Some(scaler) => scaler,
            None => scaling::Context::get(
                self.decoded.format(),
                self.decoded.width(),
                self.decoded.height(),
                Pixel::RGBA,
                self.decoded.width(),
                self.decoded.height(),
                scaling::Flags::POINT,
            )
            .map_err(|err| ThumbError::Corrupt(format!("{}: scaler: {err}", self.container)))?,
        };
        let scaled = scaler.run(&self.decoded, &mut self.rgba);
        self.scaler = Some(scaler);
        scaled.map_err(|err| ThumbError::Corrupt(format!("{}: {err}", self.container)))?;

        Ok(RawFrame {
            width: self.rgba.width(),
            height: self.rgba.height(),
            stride: self.rgba.stride(0),
            data: self.rgba.data(0).to_vec(),
        })
    }

    /// Pull the next packet belonging to our stream; `None` at end of input.
    fn next_packet(&mut self) -> Option<ffmpeg::packet::Packet> {
        for (stream, packet) in self.ictx.packets() {
            if stream.index() == self.stream_index {
                return Some(packet);
            }
        }
        None
    }
}

impl Iterator for FrameStream<'_> {
    type Item = Result<RawFrame, ThumbError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // Drain whatever the decoder already has.
            while self.decoder.receive_frame(&mut self.decoded).is_ok() {
                let index = self.decoded_count;
                self.decoded_count += 1;
                if index % select::PROBE_INTERVAL != 0 {
                    continue;
                }
                return Some(self.to_rgba());
            }

            if self.eof_sent {
                return None;
            }

            match self.next_packet() {
                Some(packet) => {
                    if let Err(err) = self.decoder.send_packet(&packet) {
                        return Some(Err(ThumbError::Corrupt(format!(
                            "{}: {err}",
                            self.container
                        ))));
                    }
                }
                None => {
                    // Flush; the drain above runs once more for buffered frames.
                    let _ = self.decoder.send_eof();
                    self.eof_sent = true;
                }
            }
        }
    }
}
