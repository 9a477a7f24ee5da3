//! Bit-exact codec checks: round trips for every packet type, literal byte
//! vectors, attribute presence subsets, and malformed input.

use std::collections::BTreeMap;

use bytes::Bytes;

use sftpio::{
    pflags, Data, DirEntry, Error, ExtendedAttr, ExtendedReply, ExtendedRequest, FileAttrs,
    FileMode, FileOwner, FileTime, FileType, Handle, HandleAttrs, Message, Open, Path, PathAttrs,
    Read, Rename, Status, StatusCode, Symlink, Version, Write,
};

fn round_trip(id: u32, message: Message) {
    let frame = message.encode(id).expect("encode");
    let (decoded_id, decoded) = Message::decode(frame).expect("decode");
    assert_eq!(decoded_id, id);
    assert_eq!(decoded, message);
}

fn sample_attrs() -> FileAttrs {
    FileAttrs {
        size: Some(0x1234_5678_9abc_def0),
        owner: Some(FileOwner {
            uid: 1000,
            gid: 1000,
        }),
        perms: Some(FileMode(0o100_644)),
        time: Some(FileTime {
            atime: 1_234_567_890,
            mtime: 1_234_567_900,
        }),
        extended: vec![ExtendedAttr {
            kind: Bytes::from_static(b"vendor@example"),
            data: Bytes::from_static(b"\x00\x01\x02"),
        }],
    }
}

fn sample_handle() -> Handle {
    Handle(Bytes::from_static(b"h-01"))
}

#[test]
fn every_request_type_round_trips() {
    round_trip(
        7,
        Message::Open(Open {
            filename: Path::from("/etc/passwd"),
            pflags: pflags::READ | pflags::WRITE,
            attrs: sample_attrs(),
        }),
    );
    round_trip(8, Message::Close(sample_handle()));
    round_trip(
        9,
        Message::Read(Read {
            handle: sample_handle(),
            offset: 0xdead_beef,
            length: 32768,
        }),
    );
    round_trip(
        10,
        Message::Write(Write {
            handle: sample_handle(),
            offset: 4096,
            data: Bytes::from_static(b"payload"),
        }),
    );
    round_trip(11, Message::LStat(Path::from("/a")));
    round_trip(12, Message::FStat(sample_handle()));
    round_trip(
        13,
        Message::SetStat(PathAttrs {
            path: Path::from("/a"),
            attrs: sample_attrs(),
        }),
    );
    round_trip(
        14,
        Message::FSetStat(HandleAttrs {
            handle: sample_handle(),
            attrs: sample_attrs(),
        }),
    );
    round_trip(15, Message::OpenDir(Path::from("/dir")));
    round_trip(16, Message::ReadDir(sample_handle()));
    round_trip(17, Message::Remove(Path::from("/gone")));
    round_trip(
        18,
        Message::MkDir(PathAttrs {
            path: Path::from("/new"),
            attrs: FileAttrs::default(),
        }),
    );
    round_trip(19, Message::RmDir(Path::from("/old")));
    round_trip(20, Message::RealPath(Path::from(".")));
    round_trip(21, Message::Stat(Path::from("/a")));
    round_trip(
        22,
        Message::Rename(Rename {
            old_path: Path::from("/from"),
            new_path: Path::from("/to"),
        }),
    );
    round_trip(23, Message::ReadLink(Path::from("/link")));
    round_trip(
        24,
        Message::Symlink(Symlink {
            link_path: Path::from("/link"),
            target_path: Path::from("/target"),
        }),
    );
    round_trip(
        25,
        Message::Extended(ExtendedRequest {
            request: Bytes::from_static(b"statvfs@openssh.com"),
            data: Bytes::from_static(b"\x01\x02\x03"),
        }),
    );
}

#[test]
fn every_reply_type_round_trips() {
    round_trip(
        1,
        Message::Status(Status {
            code: StatusCode::NoSuchFile as u32,
            message: Bytes::from_static(b"missing"),
            language: Bytes::from_static(b"en"),
        }),
    );
    round_trip(2, Message::Handle(sample_handle()));
    round_trip(3, Message::Data(Data(Bytes::from_static(b"abcd"))));
    round_trip(
        4,
        Message::Name(vec![
            DirEntry {
                filename: Path::from("a.txt"),
                long_name: Bytes::from_static(b"-rw-r--r-- a.txt"),
                attrs: sample_attrs(),
            },
            DirEntry {
                filename: Path::from("b.txt"),
                long_name: Bytes::from_static(b"-rw-r--r-- b.txt"),
                attrs: FileAttrs::default(),
            },
        ]),
    );
    round_trip(5, Message::Attrs(sample_attrs()));
    round_trip(
        6,
        Message::ExtendedReply(ExtendedReply {
            data: Bytes::from_static(b"reply-bytes"),
        }),
    );
}

#[test]
fn init_and_version_carry_the_version_in_the_id_slot() {
    let mut extensions = BTreeMap::new();
    extensions.insert(
        Bytes::from_static(b"posix-rename@openssh.com"),
        Bytes::from_static(b"1"),
    );

    // The id argument is ignored; decode always reports id 0.
    let message = Message::Init(Version {
        version: 3,
        extensions: extensions.clone(),
    });
    let frame = message.encode(42).unwrap();
    let (id, decoded) = Message::decode(frame).unwrap();
    assert_eq!(id, 0);
    assert_eq!(decoded, message);

    let message = Message::Version(Version {
        version: 3,
        extensions,
    });
    let frame = message.encode(42).unwrap();
    let (id, decoded) = Message::decode(frame).unwrap();
    assert_eq!(id, 0);
    assert_eq!(decoded, message);
}

#[test]
fn literal_init_bytes() {
    let init = Message::Init(Version {
        version: 3,
        extensions: BTreeMap::new(),
    });
    assert_eq!(
        &init.encode(0).unwrap()[..],
        &[0x01, 0x00, 0x00, 0x00, 0x03][..]
    );
}

#[test]
fn literal_open_bytes() {
    let open = Message::Open(Open {
        filename: Path::from("/x"),
        pflags: pflags::READ,
        attrs: FileAttrs::default(),
    });
    assert_eq!(
        &open.encode(7).unwrap()[..],
        &[
            0x03, // SSH_FXP_OPEN
            0x00, 0x00, 0x00, 0x07, // id
            0x00, 0x00, 0x00, 0x02, b'/', b'x', // filename
            0x00, 0x00, 0x00, 0x01, // pflags = READ
            0x00, 0x00, 0x00, 0x00, // empty attrs
        ][..]
    );
}

#[test]
fn attrs_round_trip_for_every_presence_subset() {
    let full = sample_attrs();
    for mask in 0u32..32 {
        let attrs = FileAttrs {
            size: (mask & 1 != 0).then_some(full.size.unwrap()),
            owner: (mask & 2 != 0).then_some(full.owner.unwrap()),
            perms: (mask & 4 != 0).then_some(full.perms.unwrap()),
            time: (mask & 8 != 0).then_some(full.time.unwrap()),
            extended: if mask & 16 != 0 {
                full.extended.clone()
            } else {
                Vec::new()
            },
        };
        round_trip(mask, Message::Attrs(attrs));
    }
}

#[test]
fn extended_attrs_set_the_high_flag_bit() {
    let attrs = FileAttrs {
        extended: vec![ExtendedAttr {
            kind: Bytes::from_static(b"k"),
            data: Bytes::from_static(b"v"),
        }],
        ..Default::default()
    };
    let frame = Message::Attrs(attrs).encode(1).unwrap();
    // type, id, then the flag word with only bit 31 set.
    assert_eq!(&frame[5..9], &[0x80, 0x00, 0x00, 0x00][..]);
    assert_eq!(&frame[9..13], &[0x00, 0x00, 0x00, 0x01][..]); // one pair
}

#[test]
fn unknown_packet_type_is_malformed() {
    let err = Message::decode(Bytes::from_static(&[0xff, 0, 0, 0, 1])).unwrap_err();
    assert!(matches!(err, Error::Malformed(_)));
}

#[test]
fn truncated_packets_are_malformed() {
    // Too short for the id word.
    assert!(matches!(
        Message::decode(Bytes::from_static(&[0x03, 0, 0])),
        Err(Error::Malformed(_))
    ));
    // NAME announcing one entry but carrying none.
    assert!(matches!(
        Message::decode(Bytes::from_static(&[0x68, 0, 0, 0, 1, 0, 0, 0, 1])),
        Err(Error::Malformed(_))
    ));
    // String length pointing past the end of the packet.
    assert!(matches!(
        Message::decode(Bytes::from_static(&[0x66, 0, 0, 0, 1, 0, 0, 0, 9, b'x'])),
        Err(Error::Malformed(_))
    ));
}

#[test]
fn trailing_bytes_are_malformed() {
    let mut frame = Message::Handle(sample_handle()).encode(1).unwrap().to_vec();
    frame.push(0x00);
    assert!(matches!(
        Message::decode(Bytes::from(frame)),
        Err(Error::Malformed(_))
    ));
}

#[test]
fn file_mode_partitions_type_and_permissions() {
    let mode = FileMode(0o040_755);
    assert_eq!(mode.file_type(), FileType::Directory);
    assert_eq!(mode.permissions(), 0o755);
    assert!(mode.is_directory());
    assert!(!mode.is_regular());

    assert_eq!(FileMode(0o100_644).file_type(), FileType::Regular);
    assert_eq!(FileMode(0o120_777).file_type(), FileType::Symlink);
    assert_eq!(FileMode(0xC1FF).file_type(), FileType::Socket);
    assert_eq!(FileMode(0x6000).file_type(), FileType::Block);
    assert_eq!(FileMode(0x2000).file_type(), FileType::Character);
    assert_eq!(FileMode(0x1000).file_type(), FileType::Fifo);

    // Unknown type nibbles survive verbatim.
    assert_eq!(FileMode(0x5124).file_type(), FileType::Unknown(0x5000));

    let sticky = FileMode(0o041_755);
    assert_eq!(sticky.permissions() & FileMode::STICKY, FileMode::STICKY);
}

#[test]
fn status_codes_map_to_protocol_values() {
    assert_eq!(StatusCode::try_from(0), Ok(StatusCode::Ok));
    assert_eq!(StatusCode::try_from(1), Ok(StatusCode::Eof));
    assert_eq!(StatusCode::try_from(2), Ok(StatusCode::NoSuchFile));
    assert_eq!(StatusCode::try_from(3), Ok(StatusCode::PermissionDenied));
    assert_eq!(StatusCode::try_from(4), Ok(StatusCode::Failure));
    assert_eq!(StatusCode::try_from(5), Ok(StatusCode::BadMessage));
    assert_eq!(StatusCode::try_from(6), Ok(StatusCode::NoConnection));
    assert_eq!(StatusCode::try_from(7), Ok(StatusCode::ConnectionLost));
    assert_eq!(StatusCode::try_from(8), Ok(StatusCode::OpUnsupported));
    assert_eq!(StatusCode::try_from(99), Err(99));
}
