#![no_main]

use std::io::Cursor;

use chronicle_git::{LogFormat, RecordParser, RecordReader, parse_log_output};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    for format in [LogFormat::Subject, LogFormat::Detailed] {
        let parser = RecordParser::new(format);
        let streamed: Vec<_> = RecordReader::new(Cursor::new(data), parser)
            .map_while(Result::ok)
            .collect();

        assert_eq!(streamed, parse_log_output(data, &parser));
    }
});
