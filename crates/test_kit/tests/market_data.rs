// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2026 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Generated stream codecs against hand-built exchange frames.

use nautilus_sbe::{MetaAttribute, SbeError, decode_frame, encode_frame_to_vec};
use nautilus_sbe_testkit::market_data::{
    BestBidAskStreamEvent, BoolEnum, TradesStreamEvent, TradesStreamEventTrades,
};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use rstest::rstest;

fn make_trades_buffer(num_trades: usize) -> Vec<u8> {
    let trade_block_len = 25u16;
    let body_size = 18 + 6 + (num_trades * trade_block_len as usize) + 8;
    let mut buf = vec![0u8; 8 + body_size];

    buf[0..2].copy_from_slice(&18u16.to_le_bytes());
    buf[2..4].copy_from_slice(&10000u16.to_le_bytes());
    buf[4..6].copy_from_slice(&1u16.to_le_bytes());
    buf[6..8].copy_from_slice(&0u16.to_le_bytes());

    let body = &mut buf[8..];
    body[0..8].copy_from_slice(&1_000_000i64.to_le_bytes());
    body[8..16].copy_from_slice(&1_000_001i64.to_le_bytes());
    body[16] = (-2i8) as u8;
    body[17] = (-8i8) as u8;

    body[18..20].copy_from_slice(&trade_block_len.to_le_bytes());
    body[20..24].copy_from_slice(&(num_trades as u32).to_le_bytes());

    let mut offset = 24;
    for i in 0..num_trades {
        body[offset..offset + 8].copy_from_slice(&(i as i64 + 1).to_le_bytes());
        body[offset + 8..offset + 16].copy_from_slice(&4_200_000i64.to_le_bytes());
        body[offset + 16..offset + 24].copy_from_slice(&100_000_000i64.to_le_bytes());
        body[offset + 24] = u8::from(i % 2 == 0);
        offset += trade_block_len as usize;
    }

    body[offset] = 7;
    body[offset + 1..offset + 8].copy_from_slice(b"BTCUSDT");
    buf
}

#[rstest]
fn test_layout_matches_stream() {
    assert_eq!(TradesStreamEvent::SBE_BLOCK_LENGTH, 18);
    assert_eq!(TradesStreamEvent::SBE_TEMPLATE_ID, 10000);
    assert_eq!(TradesStreamEventTrades::SBE_BLOCK_LENGTH, 25);
    assert_eq!(BestBidAskStreamEvent::SBE_BLOCK_LENGTH, 50);
    assert_eq!(BestBidAskStreamEvent::SBE_TEMPLATE_ID, 10001);
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(5)]
fn test_decode_trades(#[case] num_trades: usize) {
    let buf = make_trades_buffer(num_trades);
    let (event, consumed): (TradesStreamEvent, usize) = decode_frame(&buf, true).unwrap();

    assert_eq!(consumed, buf.len());
    assert_eq!(event.event_time, 1_000_000);
    assert_eq!(event.transact_time, 1_000_001);
    assert_eq!(event.price_exponent, -2);
    assert_eq!(event.qty_exponent, -8);
    assert_eq!(event.trades.len(), num_trades);
    assert_eq!(event.symbol, b"BTCUSDT");

    for (i, trade) in event.trades.iter().enumerate() {
        assert_eq!(trade.id, i as i64 + 1);
        assert_eq!(trade.price, 4_200_000);
        assert_eq!(trade.qty, 100_000_000);
        let expected = if i % 2 == 0 {
            BoolEnum::True
        } else {
            BoolEnum::False
        };
        assert_eq!(trade.is_buyer_maker, expected);
    }
}

#[rstest]
fn test_reencode_is_byte_identical() {
    let buf = make_trades_buffer(3);
    let (event, _): (TradesStreamEvent, usize) = decode_frame(&buf, true).unwrap();
    assert_eq!(encode_frame_to_vec(&event, true).unwrap(), buf);
}

#[rstest]
fn test_wrong_schema_id_rejected() {
    let mut buf = make_trades_buffer(1);
    buf[4..6].copy_from_slice(&99u16.to_le_bytes());

    let err = decode_frame::<TradesStreamEvent>(&buf, false).unwrap_err();
    assert!(matches!(
        err,
        SbeError::SchemaMismatch {
            expected: 1,
            actual: 99
        }
    ));
}

#[rstest]
fn test_empty_group_ignores_element_block_length() {
    let mut buf = make_trades_buffer(0);
    buf[8 + 18..8 + 20].copy_from_slice(&30u16.to_le_bytes());

    let (event, _): (TradesStreamEvent, usize) = decode_frame(&buf, true).unwrap();
    assert!(event.trades.is_empty());
}

#[rstest]
fn test_timestamp_metadata() {
    assert_eq!(
        TradesStreamEvent::event_time_meta_attribute(MetaAttribute::TimeUnit),
        "microsecond"
    );
    assert_eq!(
        TradesStreamEvent::event_time_meta_attribute(MetaAttribute::SemanticType),
        "UTCTimestamp"
    );
    assert_eq!(TradesStreamEvent::trades_id(), 100);
    assert_eq!(TradesStreamEvent::symbol_id(), 200);
}

#[rstest]
fn test_best_bid_ask_round_trip() {
    let event = BestBidAskStreamEvent {
        event_time: 1_700_000_000_000_000,
        book_update_id: 55,
        price_exponent: -2,
        qty_exponent: -6,
        bid_price: 4_199_900,
        bid_qty: 1_500_000,
        ask_price: 4_200_100,
        ask_qty: 2_000_000,
        symbol: b"BTCUSDT".to_vec(),
    };
    let buf = encode_frame_to_vec(&event, true).unwrap();
    assert_eq!(buf.len(), 8 + 50 + 1 + 7);

    let (decoded, _): (BestBidAskStreamEvent, usize) = decode_frame(&buf, true).unwrap();
    assert_eq!(decoded, event);
}

#[quickcheck]
fn prop_trades_round_trip(
    event_time: i64,
    price_exponent: i8,
    trades: Vec<(i64, i64, i64, bool)>,
    symbol: String,
) -> TestResult {
    if symbol.len() > usize::from(u8::MAX) {
        return TestResult::discard();
    }

    let event = TradesStreamEvent {
        event_time,
        transact_time: event_time,
        price_exponent,
        qty_exponent: 0,
        trades: trades
            .iter()
            .map(|&(id, price, qty, maker)| TradesStreamEventTrades {
                id,
                price,
                qty,
                is_buyer_maker: if maker { BoolEnum::True } else { BoolEnum::False },
            })
            .collect(),
        symbol: symbol.into_bytes(),
    };

    let buf = encode_frame_to_vec(&event, false).unwrap();
    let (decoded, consumed): (TradesStreamEvent, usize) = decode_frame(&buf, false).unwrap();
    TestResult::from_bool(decoded == event && consumed == buf.len())
}
