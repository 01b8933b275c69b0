// Copyright 2025 RISC Zero, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Smart contract interfaces for the delegate registry.

alloy::sol! {
    /// Read side of the delegate registry. `delegation` returns the zero address when the
    /// delegator has no delegate set for the given space id.
    #[sol(rpc)]
    interface IDelegateRegistry {
        function delegation(address delegator, bytes32 id) external view returns (address);
    }
}
