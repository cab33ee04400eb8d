#![allow(dead_code)]

use kana_highlight::{Dictionary, Tag, TagMap};
use tracing_subscriber::EnvFilter;

/// Logs alignment decisions when run with `RUST_LOG=kana_highlight=trace`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn dictionary() -> Dictionary {
    Dictionary::builder()
        .kanjidic('日', "ニチ、ジツ", "ひ、-び、-か")
        .kanjidic('本', "ホン", "もと")
        .kanjidic('語', "ゴ", "かた.る")
        .kanjidic('鼻', "ビ", "はな")
        .kanjidic('血', "ケツ", "ち")
        .kanjidic('大', "ダイ、タイ", "おお、おお.きい")
        .kanjidic('人', "ジン、ニン", "ひと")
        .kanjidic('学', "ガク", "まな.ぶ")
        .kanjidic('校', "コウ", "")
        .kanjidic('読', "ドク、トク、トウ", "よ.む")
        .kanjidic('漢', "カン", "")
        .kanjidic('字', "ジ", "あざ")
        .kanjidic('方', "ホウ", "かた")
        .kanjidic('手', "シュ", "て")
        .kanjidic('紙', "シ", "かみ")
        .jukujikun("大人", "おとな")
        .build()
}

pub fn tags() -> TagMap {
    TagMap::new()
        .with(Tag::Kanji, "<b>", "</b>")
        .with(Tag::On, "<on>", "</on>")
        .with(Tag::Kun, "<kun>", "</kun>")
        .with(Tag::Jukujikun, "<juku>", "</juku>")
}
